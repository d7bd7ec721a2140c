use crate::api::extract::JsonBody;
use crate::api::ErrorResponse;
use crate::auth::hash_password;
use crate::db::is_unique_violation;
use crate::error::ApiError;
use crate::models::NewUser;
use crate::repo::users::{self, EMAIL_CONSTRAINT, USERNAME_CONSTRAINT};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use larder_core::account::{normalize_email, validate_signup, SignupDraft};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let email = normalize_email(&req.email);
    let draft = SignupDraft {
        email: &email,
        username: req.username.trim(),
        first_name: req.first_name.trim(),
        last_name: req.last_name.trim(),
        password: &req.password,
    };
    validate_signup(&draft).into_result()?;

    let mut conn = state.pool.get()?;

    if users::email_taken(&mut conn, draft.email)? {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }
    if users::username_taken(&mut conn, draft.username)? {
        return Err(ApiError::Conflict(
            "A user with this username already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;

    let user = users::insert_user(
        &mut conn,
        &NewUser {
            email: draft.email,
            username: draft.username,
            first_name: draft.first_name,
            last_name: draft.last_name,
            password_hash: &password_hash,
        },
    )
    .map_err(|e| {
        // Lost a race with a concurrent sign-up.
        if is_unique_violation(&e, Some(EMAIL_CONSTRAINT))
            || is_unique_violation(&e, Some(USERNAME_CONSTRAINT))
        {
            ApiError::Conflict("A user with this email or username already exists".to_string())
        } else {
            e.into()
        }
    })?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}
