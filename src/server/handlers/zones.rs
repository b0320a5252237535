use axum::extract::{Extension, Json};

use super::Doc;
use crate::api::{DynAPI, RideAPI, ZoneAPI};
use crate::auth::User;
use crate::entities::RideDetails;
use crate::error::Error;
use crate::server::extract::PathParam;
use crate::zones::Zone;

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<Doc<Vec<Zone>>> {
    Json(api.list_zones().into())
}

pub async fn pending_rides(
    Extension(api): Extension<DynAPI>,
    user: User,
    PathParam(id): PathParam<String>,
) -> Result<Json<Doc<Vec<RideDetails>>>, Error> {
    let rides = api.pending_rides_in_zone(user, id).await?;

    Ok(Json(rides.into()))
}
