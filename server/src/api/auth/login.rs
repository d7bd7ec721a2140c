use crate::api::extract::JsonBody;
use crate::api::ErrorResponse;
use crate::auth::{create_session, verify_password};
use crate::error::ApiError;
use crate::repo::users;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    let invalid = || ApiError::BadRequest("Unable to log in with provided credentials".to_string());

    let user = users::find_by_email(&mut conn, req.email.trim())?.ok_or_else(invalid)?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    let auth_token = create_session(&mut conn, user.id, state.config.session_days)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse { auth_token }))
}
