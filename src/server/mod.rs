mod extract;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    handler::Handler,
    routing::{get, patch, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::Error;
use crate::server::handlers::{members, not_found, rides, zones};

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/api/v1/rides", post(rides::create))
        .route("/api/v1/rides/:id", get(rides::find))
        .route("/api/v1/rides/:id/status", patch(rides::change_status))
        .route("/api/v1/customers/me/rides", get(rides::history))
        .route("/api/v1/drivers/me/rides/zone", post(rides::pending_by_zone))
        .route("/api/v1/drivers/me/rides/status", post(rides::by_status))
        .route("/api/v1/zones", get(zones::list))
        .route("/api/v1/zones/:id/rides", get(zones::pending_rides))
        .route("/api/v1/members", post(members::create))
        .route("/api/v1/members/me", get(members::me))
        .fallback(not_found.into_service())
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| Error::unexpected_error(format!("server error: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, USER_ID_HEADER, USER_ROLE_HEADER};
    use crate::db::MemoryStore;
    use crate::engine::Engine;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tokio_test::block_on;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        router(Engine::new(MemoryStore::new()).unwrap())
    }

    fn request(
        method: &str,
        uri: &str,
        caller: Option<(Uuid, Role)>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some((id, role)) = caller {
            builder = builder
                .header(USER_ID_HEADER, id.to_string())
                .header(USER_ROLE_HEADER, role.name());
        }

        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        block_on(async {
            let response = app.clone().oneshot(req).await.unwrap();
            let status = response.status();
            let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

            (status, serde_json::from_slice(&bytes).unwrap())
        })
    }

    fn new_ride() -> Value {
        json!({
            "pickupLocation": "Mall Road",
            "dropOffLocation": "Airport",
            "rideType": "car",
            "proposedFare": 800,
        })
    }

    #[test]
    fn create_ride_returns_created_envelope() {
        let app = app();
        let customer = (Uuid::new_v4(), Role::Customer);

        let (status, body) = send(&app, request("POST", "/api/v1/rides", Some(customer), Some(new_ride())));

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
        assert_eq!(body["doc"]["status"], "requested");
        assert_eq!(body["doc"]["requesterId"], customer.0.to_string());

        let uri = format!("/api/v1/rides/{}", body["doc"]["id"].as_str().unwrap());
        let (status, body) = send(&app, request("GET", &uri, Some(customer), None));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doc"]["pickupLocation"], "Mall Road");
    }

    #[test]
    fn malformed_requests_get_fail_envelopes() {
        let app = app();
        let customer = (Uuid::new_v4(), Role::Customer);

        let mut body = new_ride();
        body.as_object_mut().unwrap().remove("proposedFare");
        let (status, body) = send(&app, request("POST", "/api/v1/rides", Some(customer), Some(body)));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["code"], 101);

        let (status, body) = send(&app, request("GET", "/api/v1/rides/not-a-uuid", Some(customer), None));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");

        let (status, body) = send(&app, request("POST", "/api/v1/rides", None, Some(new_ride())));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "fail");
    }

    #[test]
    fn unknown_rides_and_routes_are_not_found() {
        let app = app();
        let driver = (Uuid::new_v4(), Role::Driver);

        let uri = format!("/api/v1/rides/{}", Uuid::new_v4());
        let (status, body) = send(&app, request("GET", &uri, Some(driver), None));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "fail");

        let (status, body) = send(&app, request("GET", "/api/v1/nowhere", None, None));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "fail");
        assert!(body["message"].as_str().unwrap().contains("/api/v1/nowhere"));
    }

    #[test]
    fn driver_rejects_then_no_longer_sees_ride() {
        let app = app();
        let customer = (Uuid::new_v4(), Role::Customer);
        let driver = (Uuid::new_v4(), Role::Driver);

        let (_, body) = send(&app, request("POST", "/api/v1/rides", Some(customer), Some(new_ride())));
        let id = body["doc"]["id"].as_str().unwrap().to_string();

        let zone = json!({ "zone": ["Mall Road", "Jail Road"] });
        let (status, body) = send(
            &app,
            request("POST", "/api/v1/drivers/me/rides/zone", Some(driver), Some(zone.clone())),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doc"].as_array().unwrap().len(), 1);

        let uri = format!("/api/v1/rides/{}/status", id);
        let (status, body) = send(
            &app,
            request("PATCH", &uri, Some(driver), Some(json!({ "status": "rejected" }))),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doc"]["status"], "requested");
        assert_eq!(body["doc"]["rejectedBy"][0], driver.0.to_string());

        let (_, body) = send(
            &app,
            request("POST", "/api/v1/drivers/me/rides/zone", Some(driver), Some(zone)),
        );
        assert!(body["doc"].as_array().unwrap().is_empty());

        let (status, body) = send(
            &app,
            request("PATCH", &uri, Some(driver), Some(json!({ "status": "completed" }))),
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status"], "fail");
    }

    #[test]
    fn zones_are_listed() {
        let (status, body) = send(&app(), request("GET", "/api/v1/zones", None, None));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doc"].as_array().unwrap().len(), 4);
        assert_eq!(body["doc"][0]["id"], "Zone 1");
    }
}
