use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{RideMutation, Store};
use crate::entities::{Member, Ride, Status};
use crate::error::Error;

/// Store backed by in-process maps. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rides: Mutex<HashMap<Uuid, Ride>>,
    members: Mutex<HashMap<Uuid, Member>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut rides: Vec<Ride>) -> Vec<Ride> {
    rides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rides
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_ride(&self, ride: &Ride) -> Result<(), Error> {
        let mut rides = self.rides.lock().await;

        if rides.contains_key(&ride.id) {
            return Err(Error::invalid_state_error("ride already exists"));
        }

        rides.insert(ride.id, ride.clone());

        Ok(())
    }

    async fn find_ride(&self, id: Uuid) -> Result<Option<Ride>, Error> {
        Ok(self.rides.lock().await.get(&id).cloned())
    }

    async fn find_rides_by_requester(&self, requester_id: Uuid) -> Result<Vec<Ride>, Error> {
        let rides = self.rides.lock().await;

        Ok(newest_first(
            rides
                .values()
                .filter(|ride| ride.requester_id == requester_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_rides_by_driver(
        &self,
        driver_id: Uuid,
        status: Status,
    ) -> Result<Vec<Ride>, Error> {
        let rides = self.rides.lock().await;

        Ok(newest_first(
            rides
                .values()
                .filter(|ride| ride.driver_id == Some(driver_id) && ride.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn find_pending_rides(
        &self,
        areas: &[String],
        driver_id: Uuid,
    ) -> Result<Vec<Ride>, Error> {
        let rides = self.rides.lock().await;

        Ok(newest_first(
            rides
                .values()
                .filter(|ride| {
                    ride.is_requested()
                        && areas.contains(&ride.pickup_location)
                        && !ride.is_rejected_by(&driver_id)
                })
                .cloned()
                .collect(),
        ))
    }

    async fn update_ride(&self, id: Uuid, mutation: RideMutation) -> Result<Ride, Error> {
        let mut rides = self.rides.lock().await;

        let stored = rides
            .get_mut(&id)
            .ok_or_else(|| Error::not_found_error(format!("no ride found with id {}", id)))?;

        let mut ride = stored.clone();
        mutation(&mut ride)?;
        *stored = ride.clone();

        Ok(ride)
    }

    async fn insert_member(&self, member: &Member) -> Result<(), Error> {
        let mut members = self.members.lock().await;

        if members.contains_key(&member.id) {
            return Err(Error::invalid_state_error("member already exists"));
        }

        if members.values().any(|other| other.email == member.email) {
            return Err(Error::invalid_state_error("email is already registered"));
        }

        members.insert(member.id, member.clone());

        Ok(())
    }

    async fn find_member(&self, id: Uuid) -> Result<Option<Member>, Error> {
        Ok(self.members.lock().await.get(&id).cloned())
    }

    async fn find_members(&self, ids: &[Uuid]) -> Result<Vec<Member>, Error> {
        let members = self.members.lock().await;

        Ok(ids.iter().filter_map(|id| members.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, User};
    use crate::entities::{NewMember, NewRide, StatusChange};
    use tokio_test::block_on;

    fn new_ride(pickup: &str) -> Ride {
        Ride::new(
            Uuid::new_v4(),
            NewRide {
                pickup_location: pickup.into(),
                drop_off_location: "Airport".into(),
                ride_type: "car".into(),
                proposed_fare: 500.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn failed_mutation_leaves_ride_untouched() {
        let store = MemoryStore::new();
        let ride = new_ride("Mall Road");
        block_on(store.insert_ride(&ride)).unwrap();

        let err = block_on(store.update_ride(
            ride.id,
            Box::new(|ride: &mut Ride| {
                ride.proposed_fare = 1.0;
                ride.apply(StatusChange::Complete, Uuid::new_v4())
            }),
        ))
        .unwrap_err();
        assert!(err.is_invalid_state_error());

        let stored = block_on(store.find_ride(ride.id)).unwrap().unwrap();
        assert_eq!(stored, ride);
    }

    #[test]
    fn update_unknown_ride_is_not_found() {
        let store = MemoryStore::new();

        let err = block_on(store.update_ride(Uuid::new_v4(), Box::new(|_: &mut Ride| Ok(()))))
            .unwrap_err();
        assert!(err.is_not_found_error());
    }

    #[test]
    fn pending_rides_filter_by_area_and_rejection() {
        let store = MemoryStore::new();
        let driver_id = Uuid::new_v4();

        let in_zone = new_ride("Mall Road");
        let mut rejected = new_ride("Jail Road");
        rejected.reject(driver_id).unwrap();
        let elsewhere = new_ride("Johar Town");

        for ride in [&in_zone, &rejected, &elsewhere] {
            block_on(store.insert_ride(ride)).unwrap();
        }

        let areas = vec!["Mall Road".to_string(), "Jail Road".to_string()];

        let pending = block_on(store.find_pending_rides(&areas, driver_id)).unwrap();
        assert_eq!(pending, vec![in_zone.clone()]);

        let pending = block_on(store.find_pending_rides(&areas, Uuid::new_v4())).unwrap();
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn member_emails_are_unique() {
        let store = MemoryStore::new();
        let member = |email: &str| {
            Member::new(
                &User::new(Uuid::new_v4(), Role::Customer),
                NewMember {
                    name: "Ahmed Khan".into(),
                    email: email.into(),
                    phone: None,
                },
            )
            .unwrap()
        };

        block_on(store.insert_member(&member("ahmed@example.com"))).unwrap();

        let err = block_on(store.insert_member(&member("Ahmed@Example.com"))).unwrap_err();
        assert!(err.is_invalid_state_error());

        block_on(store.insert_member(&member("bilal@example.com"))).unwrap();
    }
}
