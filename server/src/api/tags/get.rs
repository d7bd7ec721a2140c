use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::models::Tag;
use crate::repo::catalog;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "tags",
    params(
        ("id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag", body = Tag),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tag>, ApiError> {
    let mut conn = state.pool.get()?;
    match catalog::get_tag(&mut conn, id) {
        Ok(tag) => Ok(Json(tag)),
        Err(diesel::result::Error::NotFound) => Err(ApiError::not_found("Tag")),
        Err(e) => Err(e.into()),
    }
}
