mod member;
mod ride;

pub use member::{Contact, Member, NewMember};
pub use ride::{NewRide, Ride, RideDetails, RideType, Status, StatusChange};
