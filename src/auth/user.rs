use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Driver,
    System,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Driver => "driver",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "driver" => Ok(Self::Driver),
            "system" => Ok(Self::System),
            _ => Err(Error::unauthenticated_error(format!("unknown role: {}", s))),
        }
    }
}

/// The authenticated caller, as forwarded by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub role: Role,
}

impl User {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn new_system_user() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::System,
        }
    }

    fn id_equals_nullable_id(&self, optional_id: Option<Uuid>) -> bool {
        if let Some(id) = optional_id {
            if self.id == id {
                return true;
            }
        }

        false
    }

    fn has_role(&self, role: String) -> bool {
        self.role.name() == role
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id)
            .add_attribute_getter("role", |recv: &User| recv.role.name().to_string())
            .add_method("id_equals_nullable_id", User::id_equals_nullable_id)
            .add_method("has_role", User::has_role)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}

#[async_trait]
impl<B> FromRequest<B> for User
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let headers = req.headers();

        let header = |name: &str| -> Result<String, Error> {
            headers
                .get(name)
                .ok_or_else(|| Error::unauthenticated_error(format!("missing {} header", name)))?
                .to_str()
                .map(|value| value.trim().to_string())
                .map_err(|_| Error::unauthenticated_error(format!("malformed {} header", name)))
        };

        let id = header(USER_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| Error::unauthenticated_error("malformed x-user-id header"))?;
        let role = header(USER_ROLE_HEADER)?.parse::<Role>()?;

        Ok(User::new(id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tokio_test::block_on;

    fn extract(headers: &[(&str, &str)]) -> Result<User, Error> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let mut parts = RequestParts::new(builder.body(()).unwrap());
        block_on(User::from_request(&mut parts))
    }

    #[test]
    fn extracts_user_from_headers() {
        let id = Uuid::new_v4();
        let raw_id = id.to_string();
        let user = extract(&[(USER_ID_HEADER, raw_id.as_str()), (USER_ROLE_HEADER, "driver")])
            .unwrap();

        assert_eq!(user, User::new(id, Role::Driver));
    }

    #[test]
    fn missing_or_malformed_headers_are_unauthenticated() {
        let err = extract(&[(USER_ROLE_HEADER, "driver")]).unwrap_err();
        assert!(err.is_unauthenticated_error());

        let err = extract(&[(USER_ID_HEADER, "42"), (USER_ROLE_HEADER, "driver")]).unwrap_err();
        assert!(err.is_unauthenticated_error());

        let id = Uuid::new_v4().to_string();
        let err =
            extract(&[(USER_ID_HEADER, id.as_str()), (USER_ROLE_HEADER, "admin")]).unwrap_err();
        assert!(err.is_unauthenticated_error());
    }
}
