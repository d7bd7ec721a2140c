use crate::api::extract::JsonBody;
use crate::api::ErrorResponse;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::ApiError;
use crate::repo::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use larder_core::account::validate_password;
use larder_core::{ValidationError, ValidationErrors};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or invalid new one", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let mut errors = ValidationErrors::new();
    if let Err(e) = validate_password("new_password", &req.new_password) {
        errors.push(e);
    }
    if !verify_password(&req.current_password, &user.password_hash) {
        errors.push(ValidationError::WrongPassword);
    }
    errors.into_result()?;

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;

    let mut conn = state.pool.get()?;
    users::set_password_hash(&mut conn, user.id, &password_hash)?;
    tracing::info!(user_id = %user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}
