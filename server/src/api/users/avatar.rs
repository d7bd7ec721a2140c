use crate::api::views::image_url;
use crate::api::extract::JsonBody;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repo::{images, users};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use larder_core::{decode_data_uri, ValidationError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// `data:image/<format>;base64,<payload>`
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar replaced", body = AvatarResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let data_uri = req
        .avatar
        .filter(|uri| !uri.trim().is_empty())
        .ok_or(ValidationError::Missing { field: "avatar" })?;
    let image = decode_data_uri(&data_uri).map_err(|e| ValidationError::InvalidImage {
        field: "avatar",
        reason: e.to_string(),
    })?;

    let mut conn = state.pool.get()?;
    let avatar_id = conn.transaction::<_, ApiError, _>(|conn| {
        let avatar_id = images::insert_image(conn, &image)?;
        if let Some(previous) = users::set_avatar(conn, user.id, Some(avatar_id))? {
            images::delete_image(conn, previous)?;
        }
        Ok(avatar_id)
    })?;

    Ok(Json(AvatarResponse {
        avatar: image_url(state.config.public_base(), avatar_id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.pool.get()?;
    conn.transaction::<_, ApiError, _>(|conn| {
        if let Some(previous) = users::set_avatar(conn, user.id, None)? {
            images::delete_image(conn, previous)?;
        }
        Ok(())
    })?;

    Ok(StatusCode::NO_CONTENT)
}
