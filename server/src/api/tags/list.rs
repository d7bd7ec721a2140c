use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::models::Tag;
use crate::repo::catalog;
use crate::AppState;
use axum::{extract::State, Json};

/// All tags, ordered by name. Not paginated.
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let mut conn = state.pool.get()?;
    Ok(Json(catalog::list_tags(&mut conn)?))
}
