use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Contact;
use crate::error::Error;
use crate::zones;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: Uuid,
    pub pickup_location: String,
    pub drop_off_location: String,
    pub ride_type: RideType,
    pub proposed_fare: f64,
    pub status: Status,
    pub requester_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub rejected_by: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RideType {
    Bike,
    Car,
    Rickshaw,
}

impl FromStr for RideType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bike" => Ok(Self::Bike),
            "car" => Ok(Self::Car),
            "rickshaw" => Ok(Self::Rickshaw),
            _ => Err(Error::invalid_input_error(format!(
                "invalid ride type: {}",
                s
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the ride carries a driver reference in this state.
    pub fn has_driver(&self) -> bool {
        matches!(self, Self::Accepted | Self::InProgress | Self::Completed)
    }

    pub fn can_transition_to(&self, next: Status) -> bool {
        matches!(
            (self, next),
            (Self::Requested, Self::Accepted)
                | (Self::Requested, Self::Cancelled)
                | (Self::Accepted, Self::InProgress)
                | (Self::Accepted, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(Self::Requested),
            "accepted" => Ok(Self::Accepted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(Error::invalid_input_error(format!("invalid status: {}", s))),
        }
    }
}

/// A status change requested by a caller.
///
/// `rejected` is not a ride state: it only hides the ride from the rejecting driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusChange {
    Accept,
    Reject,
    Start,
    Complete,
    Cancel,
}

impl StatusChange {
    /// Name of the policy action guarding this change.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }
}

impl FromStr for StatusChange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Self::Accept),
            "rejected" => Ok(Self::Reject),
            "in_progress" => Ok(Self::Start),
            "completed" => Ok(Self::Complete),
            "cancelled" => Ok(Self::Cancel),
            "requested" => Err(Error::invalid_state_error(
                "a ride cannot be moved back to requested",
            )),
            _ => Err(Error::invalid_input_error(format!("invalid status: {}", s))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRide {
    pub pickup_location: String,
    pub drop_off_location: String,
    pub ride_type: String,
    pub proposed_fare: f64,
}

/// A ride together with the contacts of the people involved.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RideDetails {
    #[serde(flatten)]
    pub ride: Ride,
    pub requester: Option<Contact>,
    pub driver: Option<Contact>,
}

impl Ride {
    pub fn new(requester_id: Uuid, params: NewRide) -> Result<Self, Error> {
        let pickup_location = params.pickup_location.trim().to_string();
        let drop_off_location = params.drop_off_location.trim().to_string();

        if !zones::is_known_location(&pickup_location) {
            return Err(Error::invalid_input_error(format!(
                "unknown pickup location: {}",
                pickup_location
            )));
        }

        if drop_off_location.is_empty() {
            return Err(Error::invalid_input_error("drop-off location is required"));
        }

        if pickup_location == drop_off_location {
            return Err(Error::invalid_input_error(
                "pickup and drop-off locations must differ",
            ));
        }

        let ride_type = params.ride_type.parse::<RideType>()?;

        if !params.proposed_fare.is_finite() || params.proposed_fare <= 0.0 {
            return Err(Error::invalid_input_error("proposed fare must be positive"));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            pickup_location,
            drop_off_location,
            ride_type,
            proposed_fare: params.proposed_fare,
            status: Status::Requested,
            requester_id,
            driver_id: None,
            rejected_by: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    pub fn is_requested(&self) -> bool {
        self.status == Status::Requested
    }

    pub fn requested_by(&self, user_id: Uuid) -> bool {
        self.requester_id == user_id
    }

    pub fn is_rejected_by(&self, driver_id: &Uuid) -> bool {
        self.rejected_by.contains(driver_id)
    }

    /// Apply `change` on behalf of `actor_id`.
    #[tracing::instrument(skip(self), fields(ride_id = %self.id))]
    pub fn apply(&mut self, change: StatusChange, actor_id: Uuid) -> Result<(), Error> {
        match change {
            StatusChange::Accept => self.accept(actor_id),
            StatusChange::Reject => self.reject(actor_id),
            StatusChange::Start => self.transition(Status::InProgress),
            StatusChange::Complete => self.transition(Status::Completed),
            StatusChange::Cancel => self.transition(Status::Cancelled),
        }
    }

    pub fn accept(&mut self, driver_id: Uuid) -> Result<(), Error> {
        self.transition(Status::Accepted)?;
        self.driver_id = Some(driver_id);

        Ok(())
    }

    pub fn reject(&mut self, driver_id: Uuid) -> Result<(), Error> {
        if !self.is_requested() {
            return Err(Error::invalid_state_error(format!(
                "a ride that is {} cannot be rejected",
                self.status.name()
            )));
        }

        if self.rejected_by.insert(driver_id) {
            self.updated_at = Utc::now();
        }

        Ok(())
    }

    pub fn transition(&mut self, next: Status) -> Result<(), Error> {
        if !self.status.can_transition_to(next) {
            return Err(Error::invalid_state_error(format!(
                "cannot move a ride from {} to {}",
                self.status.name(),
                next.name()
            )));
        }

        let now = Utc::now();

        self.status = next;
        self.updated_at = now;

        if !next.has_driver() {
            self.driver_id = None;
        }

        if next == Status::Completed {
            self.completed_at = Some(now);
        }

        Ok(())
    }
}

impl PolarClass for Ride {
    fn get_polar_class_builder() -> oso::ClassBuilder<Ride> {
        oso::Class::builder()
            .name("Ride")
            .add_attribute_getter("id", |recv: &Ride| recv.id)
            .add_attribute_getter("requester_id", |recv: &Ride| recv.requester_id)
            .add_attribute_getter("driver_id", |recv: &Ride| recv.driver_id)
            .add_attribute_getter("status", |recv: &Ride| recv.status.name().to_string())
            .add_method("requested_by", Ride::requested_by)
            .add_method("is_requested", Ride::is_requested)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Ride::get_polar_class_builder();
        builder.build()
    }
}
