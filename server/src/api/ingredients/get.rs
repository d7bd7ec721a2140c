use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::repo::catalog;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient", body = Ingredient),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ingredient>, ApiError> {
    let mut conn = state.pool.get()?;
    match catalog::get_ingredient(&mut conn, id) {
        Ok(ingredient) => Ok(Json(ingredient)),
        Err(diesel::result::Error::NotFound) => Err(ApiError::not_found("Ingredient")),
        Err(e) => Err(e.into()),
    }
}
