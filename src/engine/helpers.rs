use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use super::Engine;

use crate::{
    entities::{Contact, Ride, RideDetails},
    error::Error,
};

impl Engine {
    /// Join requester and driver contacts onto `rides`.
    #[tracing::instrument(skip_all, fields(rides = rides.len()))]
    pub(super) async fn with_contacts(&self, rides: Vec<Ride>) -> Result<Vec<RideDetails>, Error> {
        let ids: BTreeSet<Uuid> = rides
            .iter()
            .flat_map(|ride| std::iter::once(ride.requester_id).chain(ride.driver_id))
            .collect();

        let ids: Vec<Uuid> = ids.into_iter().collect();

        let contacts: HashMap<Uuid, Contact> = self
            .store
            .find_members(&ids)
            .await?
            .into_iter()
            .map(|member| (member.id, member.contact()))
            .collect();

        Ok(rides
            .into_iter()
            .map(|ride| RideDetails {
                requester: contacts.get(&ride.requester_id).cloned(),
                driver: ride.driver_id.and_then(|id| contacts.get(&id).cloned()),
                ride,
            })
            .collect())
    }

    pub(super) async fn fetch_ride(&self, id: Uuid) -> Result<Ride, Error> {
        self.store
            .find_ride(id)
            .await?
            .ok_or_else(|| Error::not_found_error(format!("no ride found with id {}", id)))
    }
}
