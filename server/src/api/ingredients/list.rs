use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::repo::catalog;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IngredientSearchParams {
    /// Case-insensitive name search; names starting with it come first
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(IngredientSearchParams),
    responses(
        (status = 200, description = "Matching ingredients", body = Vec<Ingredient>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<IngredientSearchParams>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    let mut conn = state.pool.get()?;
    Ok(Json(catalog::search_ingredients(
        &mut conn,
        params.name.as_deref(),
    )?))
}
