use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::RideAPI,
    auth::{Platform, User},
    entities::{NewRide, Ride, RideDetails, Status, StatusChange},
    error::Error,
    zones,
};

#[async_trait]
impl RideAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_ride(&self, user: User, params: NewRide) -> Result<Ride, Error> {
        self.authorize(user.clone(), "create_ride", Platform::default())?;

        let ride = Ride::new(user.id, params)?;

        self.store.insert_ride(&ride).await?;

        tracing::info!(ride_id = %ride.id, "ride requested");

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn find_ride(&self, user: User, id: Uuid) -> Result<RideDetails, Error> {
        let ride = self.fetch_ride(id).await?;

        self.authorize(user.clone(), "read", ride.clone())?;

        let mut details = self.with_contacts(vec![ride]).await?;

        details
            .pop()
            .ok_or_else(|| Error::unexpected_error("ride lost while joining contacts"))
    }

    #[tracing::instrument(skip(self))]
    async fn ride_history(&self, user: User) -> Result<Vec<RideDetails>, Error> {
        self.authorize(user.clone(), "list_history", Platform::default())?;

        let rides = self.store.find_rides_by_requester(user.id).await?;

        self.with_contacts(rides).await
    }

    #[tracing::instrument(skip(self))]
    async fn pending_rides(
        &self,
        user: User,
        areas: Vec<String>,
    ) -> Result<Vec<RideDetails>, Error> {
        self.authorize(user.clone(), "list_pending", Platform::default())?;

        if areas.is_empty() {
            return Ok(vec![]);
        }

        let rides = self.store.find_pending_rides(&areas, user.id).await?;

        self.with_contacts(rides).await
    }

    #[tracing::instrument(skip(self))]
    async fn pending_rides_in_zone(
        &self,
        user: User,
        zone_id: String,
    ) -> Result<Vec<RideDetails>, Error> {
        self.authorize(user.clone(), "list_pending", Platform::default())?;

        let areas = zones::areas(&zone_id)
            .ok_or_else(|| Error::not_found_error(format!("no zone found with id {}", zone_id)))?;

        self.pending_rides(user, areas).await
    }

    #[tracing::instrument(skip(self))]
    async fn driver_rides(&self, user: User, status: Status) -> Result<Vec<RideDetails>, Error> {
        self.authorize(user.clone(), "list_by_status", Platform::default())?;

        let rides = self.store.find_rides_by_driver(user.id, status).await?;

        self.with_contacts(rides).await
    }

    #[tracing::instrument(skip(self))]
    async fn change_status(
        &self,
        user: User,
        id: Uuid,
        change: StatusChange,
    ) -> Result<Ride, Error> {
        // authorized against a snapshot, the transition guard re-runs under the store lock
        let ride = self.fetch_ride(id).await?;

        self.authorize(user.clone(), change.action(), ride.clone())?;

        let actor_id = user.id;
        let ride = self
            .store
            .update_ride(
                id,
                Box::new(move |ride: &mut Ride| ride.apply(change, actor_id)),
            )
            .await?;

        tracing::info!(ride_id = %ride.id, status = ride.status.name(), "ride status changed");

        Ok(ride)
    }
}
