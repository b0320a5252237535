use axum::extract::{Extension, Json};
use axum::http::StatusCode;

use super::Doc;
use crate::api::{DynAPI, MemberAPI};
use crate::auth::User;
use crate::entities::{Member, NewMember};
use crate::error::Error;
use crate::server::extract::JsonBody;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    JsonBody(params): JsonBody<NewMember>,
) -> Result<(StatusCode, Json<Doc<Member>>), Error> {
    let member = api.create_member(user, params).await?;

    Ok((StatusCode::CREATED, Json(member.into())))
}

pub async fn me(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Doc<Member>>, Error> {
    let id = user.id;
    let member = api.find_member(user, id).await?;

    Ok(Json(member.into()))
}
