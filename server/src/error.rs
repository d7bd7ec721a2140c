use crate::api::ErrorResponse;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use larder_core::{ValidationError, ValidationErrors};
use thiserror::Error;

/// Failure of a single request, mapped to one HTTP status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// A request in the wrong state, e.g. removing a relation that does not exist.
    #[error("{0}")]
    BadRequest(String),

    /// A JSON body that parsed but did not fit the request type.
    #[error("Invalid request body")]
    InvalidBody { field: String, message: String },

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Authentication credentials were not provided")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::InvalidBody { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => ErrorResponse {
                error: self.to_string(),
                fields: Some(
                    errors
                        .by_field()
                        .into_iter()
                        .map(|(field, messages)| (field.to_string(), messages))
                        .collect(),
                ),
            },
            ApiError::InvalidBody { field, message } => ErrorResponse {
                error: self.to_string(),
                fields: Some([(field.clone(), vec![message.clone()])].into()),
            },
            _ => ErrorResponse::new(self.to_string()),
        }
    }
}

const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Split a body deserialization failure into the offending field and the
/// message. Errors without a field path are reported under `non_field_errors`.
fn body_error_field(text: &str) -> (String, String) {
    let detail = text.strip_prefix(DESERIALIZE_PREFIX).unwrap_or(text);

    if let Some((path, message)) = detail.split_once(": ") {
        if !path.is_empty() && !path.contains(char::is_whitespace) {
            return (path.to_string(), message.to_string());
        }
    }
    if let Some(rest) = detail.strip_prefix("missing field `") {
        if let Some((field, _)) = rest.split_once('`') {
            return (field.to_string(), "This field is required".to_string());
        }
    }
    ("non_field_errors".to_string(), detail.to_string())
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                let (field, message) = body_error_field(&e.body_text());
                ApiError::InvalidBody { field, message }
            }
            JsonRejection::BytesRejection(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                ApiError::PayloadTooLarge("Request body is too large".to_string())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation(error.into())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => ApiError::NotFound("Not found".to_string()),
            other => ApiError::Internal(format!("Database error: {other}")),
        }
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(error: diesel::r2d2::PoolError) -> Self {
        ApiError::Internal(format!("Failed to get database connection: {error}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("{}", detail);
        }
        (self.status(), Json(self.body())).into_response()
    }
}
