//! Static directory of pickup zones.
//!
//! Drivers subscribe to a zone and only see pending rides whose pickup
//! location belongs to it.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Zone {
    pub id: &'static str,
    pub areas: &'static [&'static str],
}

const ZONES: &[Zone] = &[
    Zone {
        id: "Zone 1",
        areas: &["Mall Road", "Jail Road", "Fortress Stadium", "Garhi Shahu"],
    },
    Zone {
        id: "Zone 2",
        areas: &["Bahria Town", "Thokar Niaz Baig", "Shahkam Chowk", "Park View"],
    },
    Zone {
        id: "Zone 3",
        areas: &["Johar Town", "Model Town", "Township", "Iqbal Town"],
    },
    Zone {
        id: "Zone 4",
        areas: &["Dha", "Airport", "Barki Road", "Bhatta Chowk"],
    },
];

pub fn all() -> &'static [Zone] {
    ZONES
}

pub fn find(id: &str) -> Option<&'static Zone> {
    ZONES.iter().find(|zone| zone.id == id)
}

/// Location names of the zone as owned strings, ready to be used as a ride filter.
pub fn areas(id: &str) -> Option<Vec<String>> {
    find(id).map(|zone| zone.areas.iter().map(|area| area.to_string()).collect())
}

pub fn zone_of(location: &str) -> Option<&'static Zone> {
    ZONES.iter().find(|zone| zone.areas.contains(&location))
}

pub fn is_known_location(location: &str) -> bool {
    zone_of(location).is_some()
}
