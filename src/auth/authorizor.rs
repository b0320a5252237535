use oso::{Oso, PolarClass};

use crate::auth::User;
use crate::entities::Ride;
use crate::error::Error;

/// Resource standing for the ride board as a whole, used for permissions
/// that are not tied to one ride.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Platform;

impl PolarClass for Platform {
    fn get_polar_class_builder() -> oso::ClassBuilder<Platform> {
        oso::Class::builder().name("Platform")
    }
}

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class())?;
    o.register_class(User::get_polar_class())?;
    o.register_class(Ride::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[cfg(test)]
fn new_ride(requester_id: uuid::Uuid) -> Ride {
    use crate::entities::NewRide;

    Ride::new(
        requester_id,
        NewRide {
            pickup_location: "Mall Road".into(),
            drop_off_location: "Airport".into(),
            ride_type: "car".into(),
            proposed_fare: 800.0,
        },
    )
    .unwrap()
}

#[test]
fn platform_role_test() {
    use crate::auth::Role;
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let customer = User::new(Uuid::new_v4(), Role::Customer);
    let driver = User::new(Uuid::new_v4(), Role::Driver);
    let system = User::new_system_user();

    for action in ["create_ride", "list_history"] {
        let result = authorizor.is_allowed(customer.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), true);

        let result = authorizor.is_allowed(driver.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), false);

        let result = authorizor.is_allowed(system.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), false);
    }

    for action in ["list_pending", "list_by_status"] {
        let result = authorizor.is_allowed(customer.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), false);

        let result = authorizor.is_allowed(driver.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), true);
    }

    for action in ["list_pending", "list_by_status"] {
        let result = authorizor.is_allowed(system.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), true);
    }
}

#[test]
fn ride_requester_role_test() {
    use crate::auth::Role;
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let customer = User::new(Uuid::new_v4(), Role::Customer);
    let stranger = User::new(Uuid::new_v4(), Role::Customer);
    let ride = new_ride(customer.id);

    let result = authorizor.is_allowed(customer.clone(), "read", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(customer.clone(), "cancel", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(customer.clone(), "accept", ride.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(customer.clone(), "complete", ride.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(stranger.clone(), "read", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(stranger.clone(), "cancel", ride.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn ride_candidate_and_driver_role_test() {
    use crate::auth::Role;
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let driver = User::new(Uuid::new_v4(), Role::Driver);
    let other_driver = User::new(Uuid::new_v4(), Role::Driver);
    let mut ride = new_ride(Uuid::new_v4());

    // before the ride is accepted

    let result = authorizor.is_allowed(driver.clone(), "accept", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(driver.clone(), "reject", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(driver.clone(), "start", ride.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(driver.clone(), "cancel", ride.clone());
    assert_eq!(result.unwrap(), false);

    ride.accept(driver.id).unwrap();

    // after the ride is accepted

    let result = authorizor.is_allowed(driver.clone(), "accept", ride.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(driver.clone(), "start", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(driver.clone(), "complete", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(driver.clone(), "cancel", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(other_driver.clone(), "accept", ride.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(other_driver.clone(), "complete", ride.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn ride_system_role_test() {
    use crate::auth::Role;
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let unprivileged = User::new(Uuid::new_v4(), Role::Customer);
    let system = User::new_system_user();
    let mut ride = new_ride(Uuid::new_v4());

    let result = authorizor.is_allowed(system.clone(), "cancel", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(system.clone(), "accept", ride.clone());
    assert_eq!(result.unwrap(), false);

    ride.accept(Uuid::new_v4()).unwrap();

    let result = authorizor.is_allowed(system.clone(), "start", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(unprivileged.clone(), "start", ride.clone());
    assert_eq!(result.unwrap(), false);
}
