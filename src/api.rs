use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Member, NewMember, NewRide, Ride, RideDetails, Status, StatusChange};
use crate::error::Error;
use crate::zones::Zone;

#[async_trait]
pub trait RideAPI {
    async fn create_ride(&self, user: User, params: NewRide) -> Result<Ride, Error>;
    async fn find_ride(&self, user: User, id: Uuid) -> Result<RideDetails, Error>;
    async fn ride_history(&self, user: User) -> Result<Vec<RideDetails>, Error>;
    async fn pending_rides(&self, user: User, areas: Vec<String>)
        -> Result<Vec<RideDetails>, Error>;
    async fn pending_rides_in_zone(&self, user: User, zone_id: String)
        -> Result<Vec<RideDetails>, Error>;
    async fn driver_rides(&self, user: User, status: Status) -> Result<Vec<RideDetails>, Error>;
    async fn change_status(&self, user: User, id: Uuid, change: StatusChange)
        -> Result<Ride, Error>;
}

#[async_trait]
pub trait MemberAPI {
    async fn create_member(&self, user: User, params: NewMember) -> Result<Member, Error>;
    async fn find_member(&self, user: User, id: Uuid) -> Result<Member, Error>;
}

pub trait ZoneAPI {
    fn list_zones(&self) -> Vec<Zone>;
}

pub trait API: RideAPI + MemberAPI + ZoneAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
