use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::repo::images;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/images endpoints (mounted at /api/images)
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_image))
}

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = state.pool.get()?;
    let image = images::get_image(&mut conn, id).map_err(|e| match e {
        diesel::result::Error::NotFound => ApiError::not_found("Image"),
        other => other.into(),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            // Images are immutable: a replaced avatar gets a new id.
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        image.data,
    ))
}

#[derive(OpenApi)]
#[openapi(paths(get_image))]
pub struct ApiDoc;
