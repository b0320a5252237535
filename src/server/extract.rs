use async_trait::async_trait;
use axum::{
    body::HttpBody,
    extract::{FromRequest, Json, Path, RequestParts},
    BoxError,
};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// JSON request body whose rejections are reported as validation errors.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for JsonBody<T>
where
    T: DeserializeOwned,
    B: HttpBody + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req)
            .await
            .map_err(|rejection| Error::invalid_input_error(rejection.to_string()))?;

        Ok(Self(value))
    }
}

/// Path segments whose rejections are reported as validation errors.
#[derive(Debug)]
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for PathParam<T>
where
    T: DeserializeOwned + Send,
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request(req)
            .await
            .map_err(|rejection| Error::invalid_input_error(rejection.to_string()))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tokio_test::block_on;

    #[derive(Debug, serde::Deserialize)]
    struct Fare {
        amount: f64,
    }

    fn json_request(body: &str) -> RequestParts<Body> {
        RequestParts::new(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
    }

    #[test]
    fn json_body_is_decoded() {
        let mut req = json_request(r#"{"amount": 250}"#);

        let JsonBody(fare) = block_on(JsonBody::<Fare>::from_request(&mut req)).unwrap();
        assert_eq!(fare.amount, 250.0);
    }

    #[test]
    fn bad_json_bodies_are_invalid_input() {
        for body in [r#"{}"#, r#"{"amount": "cheap"}"#, "not json"] {
            let mut req = json_request(body);

            let err = block_on(JsonBody::<Fare>::from_request(&mut req)).unwrap_err();
            assert!(err.is_invalid_input_error(), "{}", body);
        }

        let mut req = RequestParts::new(
            Request::builder()
                .method("POST")
                .uri("/")
                .body(Body::from(r#"{"amount": 250}"#))
                .unwrap(),
        );
        let err = block_on(JsonBody::<Fare>::from_request(&mut req)).unwrap_err();
        assert!(err.is_invalid_input_error());
    }
}
