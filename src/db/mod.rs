mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Member, Ride, Status};
use crate::error::Error;

/// Change applied to a ride while the store holds it exclusively.
///
/// Returning an error leaves the stored ride untouched.
pub type RideMutation = Box<dyn FnOnce(&mut Ride) -> Result<(), Error> + Send>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_ride(&self, ride: &Ride) -> Result<(), Error>;

    async fn find_ride(&self, id: Uuid) -> Result<Option<Ride>, Error>;

    /// Rides created by `requester_id`, newest first.
    async fn find_rides_by_requester(&self, requester_id: Uuid) -> Result<Vec<Ride>, Error>;

    async fn find_rides_by_driver(&self, driver_id: Uuid, status: Status)
        -> Result<Vec<Ride>, Error>;

    /// Requested rides picked up in one of `areas` that `driver_id` has not rejected, newest first.
    async fn find_pending_rides(
        &self,
        areas: &[String],
        driver_id: Uuid,
    ) -> Result<Vec<Ride>, Error>;

    async fn update_ride(&self, id: Uuid, mutation: RideMutation) -> Result<Ride, Error>;

    async fn insert_member(&self, member: &Member) -> Result<(), Error>;

    async fn find_member(&self, id: Uuid) -> Result<Option<Member>, Error>;

    async fn find_members(&self, ids: &[Uuid]) -> Result<Vec<Member>, Error>;
}
