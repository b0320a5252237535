use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        Error::config_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::database_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        Error::policy_error(err)
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self.code {
            100 => StatusCode::CONFLICT,
            101 => StatusCode::BAD_REQUEST,
            102 => StatusCode::FORBIDDEN,
            103 => StatusCode::UNAUTHORIZED,
            104 => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.code < 100
    }

    pub fn is_invalid_state_error(&self) -> bool {
        self.code == 100
    }

    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_unauthorized_error(&self) -> bool {
        self.code == 102
    }

    pub fn is_unauthenticated_error(&self) -> bool {
        self.code == 103
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 104
    }

    /// A transition the ride lifecycle does not allow.
    pub fn invalid_state_error(message: impl Into<String>) -> Self {
        Self {
            code: 100,
            message: message.into(),
        }
    }

    pub fn invalid_input_error(message: impl Into<String>) -> Self {
        Self {
            code: 101,
            message: message.into(),
        }
    }

    pub fn unauthorized_error() -> Self {
        Self {
            code: 102,
            message: "access denied".into(),
        }
    }

    pub fn unauthenticated_error(message: impl Into<String>) -> Self {
        Self {
            code: 103,
            message: message.into(),
        }
    }

    pub fn not_found_error(message: impl Into<String>) -> Self {
        Self {
            code: 104,
            message: message.into(),
        }
    }

    pub fn config_error<T: Display>(err: T) -> Self {
        Self {
            code: 1,
            message: format!("configuration error: {}", err),
        }
    }

    pub fn database_error<T: Debug>(err: T) -> Self {
        Self {
            code: 2,
            message: format!("database error: {:?}", err),
        }
    }

    pub fn policy_error<T: Debug>(err: T) -> Self {
        Self {
            code: 3,
            message: format!("policy error: {:?}", err),
        }
    }

    pub fn unexpected_error(message: impl Into<String>) -> Self {
        Self {
            code: 5,
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (envelope_status, message) = if self.is_internal() {
            tracing::error!(code = self.code, "{}", self.message);
            ("error", "Internal Server Error".to_string())
        } else {
            ("fail", self.message)
        };

        let body = Json(json!({
            "status": envelope_status,
            "code": self.code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[test]
fn client_errors_keep_their_message() {
    let err = Error::not_found_error("ride not found");
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert!(!err.is_internal());

    let err = Error::invalid_state_error("cannot move from requested to completed");
    assert_eq!(err.status_code(), StatusCode::CONFLICT);

    assert_eq!(
        Error::unauthenticated_error("missing x-user-id").status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        Error::unauthorized_error().status_code(),
        StatusCode::FORBIDDEN
    );
}

#[test]
fn internal_errors_map_to_500() {
    let err = Error::database_error("connection reset");
    assert!(err.is_internal());
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
