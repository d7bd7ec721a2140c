use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use larder_core::short_link::short_url;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::find_recipe;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Short link to the recipe", body = ShortLinkResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShortLinkResponse>, ApiError> {
    let mut conn = state.pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;

    Ok(Json(ShortLinkResponse {
        short_link: short_url(state.config.public_base(), &recipe.short_link),
    }))
}
