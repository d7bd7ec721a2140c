use crate::api::ErrorResponse;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the authenticated user.
///
/// Accepts `Authorization: Token <t>` as well as `Authorization: Bearer <t>`.
pub struct AuthUser(pub User);

/// Like [`AuthUser`], but a request without an Authorization header is
/// anonymous instead of rejected. A header carrying a bad token is still a 401.
pub struct MaybeAuthUser(pub Option<User>);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|user| user.id)
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided",
            ),
            AuthError::InvalidHeader => (StatusCode::UNAUTHORIZED, "Invalid Authorization header"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Token carried by the Authorization header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidHeader)?;
    parse_authorization(value)
        .map(Some)
        .ok_or(AuthError::InvalidFormat)
}

fn parse_authorization(value: &str) -> Option<&str> {
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

fn resolve_user(state: &AppState, token: &str) -> Result<User, AuthError> {
    let mut conn = state.pool.get().map_err(|e| {
        tracing::error!("Failed to get database connection: {}", e);
        AuthError::Unavailable
    })?;

    get_user_from_token(&mut conn, token)
        .map_err(|e| {
            tracing::error!("Failed to look up session: {}", e);
            AuthError::Unavailable
        })?
        .ok_or(AuthError::InvalidToken)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = token_from_headers(&parts.headers)?.ok_or(AuthError::MissingHeader)?;
        resolve_user(&state, token).map(AuthUser)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match token_from_headers(&parts.headers)? {
            Some(token) => resolve_user(&state, token).map(|user| MaybeAuthUser(Some(user))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
