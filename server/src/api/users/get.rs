use crate::api::views::UserResponse;
use crate::api::ErrorResponse;
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::repo::{follows, users};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    let user = users::find_user(&mut conn, id).map_err(|e| match e {
        diesel::result::Error::NotFound => ApiError::not_found("User"),
        other => other.into(),
    })?;

    let is_subscribed = match viewer.id() {
        Some(viewer_id) => follows::followed_among(&mut conn, viewer_id, &[user.id])?
            .contains(&user.id),
        None => false,
    };

    Ok(Json(UserResponse::new(
        &user,
        is_subscribed,
        state.config.public_base(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Json<UserResponse> {
    Json(UserResponse::new(&user, false, state.config.public_base()))
}
