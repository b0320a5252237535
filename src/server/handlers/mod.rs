pub mod members;
pub mod rides;
pub mod zones;

use axum::http::Uri;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Doc<T> {
    pub status: String,
    pub doc: T,
}

impl<T> From<T> for Doc<T> {
    fn from(doc: T) -> Self {
        Self {
            status: "success".into(),
            doc,
        }
    }
}

pub async fn not_found(uri: Uri) -> Error {
    Error::not_found_error(format!("Couldn't find {} on this server!", uri))
}
