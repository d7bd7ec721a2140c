use crate::api::ErrorResponse;
use crate::auth::{revoke_session, token_from_headers, AuthUser};
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};

#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = token_from_headers(&headers)
        .ok()
        .flatten()
        .ok_or(ApiError::Unauthorized)?;

    let mut conn = state.pool.get()?;
    revoke_session(&mut conn, token)?;
    tracing::info!(user_id = %user.id, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}
