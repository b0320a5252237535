use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Role, User};
use crate::error::Error;

/// Display profile of a customer or driver.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The part of a member shown next to a ride.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl Member {
    pub fn new(user: &User, params: NewMember) -> Result<Self, Error> {
        let name = params.name.trim().to_string();
        let email = params.email.trim().to_lowercase();
        let phone = params
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        if name.is_empty() {
            return Err(Error::invalid_input_error("name is required"));
        }

        if !email.contains('@') {
            return Err(Error::invalid_input_error("a valid email is required"));
        }

        Ok(Self {
            id: user.id,
            name,
            email,
            phone,
            role: user.role,
            created_at: Utc::now(),
        })
    }

    pub fn contact(&self) -> Contact {
        Contact {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[test]
fn new_member_normalizes_input() {
    let user = User::new(Uuid::new_v4(), Role::Customer);

    let member = Member::new(
        &user,
        NewMember {
            name: " Ahmed Khan ".into(),
            email: "Ahmed@Example.com".into(),
            phone: Some("   ".into()),
        },
    )
    .unwrap();

    assert_eq!(member.id, user.id);
    assert_eq!(member.role, Role::Customer);
    assert_eq!(member.name, "Ahmed Khan");
    assert_eq!(member.email, "ahmed@example.com");
    assert!(member.phone.is_none());
    assert_eq!(member.contact().name, "Ahmed Khan");
}

#[test]
fn new_member_validation() {
    let user = User::new(Uuid::new_v4(), Role::Driver);

    let err = Member::new(
        &user,
        NewMember {
            name: "".into(),
            email: "driver@example.com".into(),
            phone: None,
        },
    )
    .unwrap_err();
    assert!(err.is_invalid_input_error());

    let err = Member::new(
        &user,
        NewMember {
            name: "Sarah Ali".into(),
            email: "not-an-email".into(),
            phone: None,
        },
    )
    .unwrap_err();
    assert!(err.is_invalid_input_error());
}
