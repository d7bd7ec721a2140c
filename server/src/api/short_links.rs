//! `/s/{token}`: short links handed out by `GET /api/recipes/{id}/get-link`.

use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::repo::recipes;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use larder_core::short_link::recipe_url;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new().route("/s/{token}", get(follow_short_link))
}

#[utoipa::path(
    get,
    path = "/s/{token}",
    tag = "recipes",
    params(
        ("token" = String, Path, description = "Short-link token")
    ),
    responses(
        (status = 302, description = "Redirect to the recipe page"),
        (status = 404, description = "Unknown short link", body = ErrorResponse)
    )
)]
pub async fn follow_short_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = state.pool.get()?;
    let recipe_id = recipes::find_by_short_link(&mut conn, &token)?
        .ok_or_else(|| ApiError::not_found("Short link"))?;

    Ok((
        StatusCode::FOUND,
        [(
            header::LOCATION,
            recipe_url(state.config.public_base(), &recipe_id),
        )],
    ))
}

#[derive(OpenApi)]
#[openapi(paths(follow_short_link))]
pub struct ApiDoc;
