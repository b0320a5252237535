use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Doc;
use crate::api::{DynAPI, RideAPI};
use crate::auth::User;
use crate::entities::{NewRide, Ride, RideDetails, Status, StatusChange};
use crate::error::Error;
use crate::server::extract::{JsonBody, PathParam};

#[derive(Serialize, Deserialize)]
pub struct ZoneParams {
    zone: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct StatusParams {
    status: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    JsonBody(params): JsonBody<NewRide>,
) -> Result<(StatusCode, Json<Doc<Ride>>), Error> {
    let ride = api.create_ride(user, params).await?;

    Ok((StatusCode::CREATED, Json(ride.into())))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Doc<RideDetails>>, Error> {
    let ride = api.find_ride(user, id).await?;

    Ok(Json(ride.into()))
}

pub async fn history(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Doc<Vec<RideDetails>>>, Error> {
    let rides = api.ride_history(user).await?;

    Ok(Json(rides.into()))
}

pub async fn pending_by_zone(
    Extension(api): Extension<DynAPI>,
    user: User,
    JsonBody(params): JsonBody<ZoneParams>,
) -> Result<Json<Doc<Vec<RideDetails>>>, Error> {
    let rides = api.pending_rides(user, params.zone).await?;

    Ok(Json(rides.into()))
}

pub async fn by_status(
    Extension(api): Extension<DynAPI>,
    user: User,
    JsonBody(params): JsonBody<StatusParams>,
) -> Result<Json<Doc<Vec<RideDetails>>>, Error> {
    let status = params.status.parse::<Status>()?;
    let rides = api.driver_rides(user, status).await?;

    Ok(Json(rides.into()))
}

pub async fn change_status(
    Extension(api): Extension<DynAPI>,
    user: User,
    PathParam(id): PathParam<Uuid>,
    JsonBody(params): JsonBody<StatusParams>,
) -> Result<Json<Doc<Ride>>, Error> {
    let change = params.status.parse::<StatusChange>()?;
    let ride = api.change_status(user, id, change).await?;

    Ok(Json(ride.into()))
}
