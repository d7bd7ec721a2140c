use crate::api::views::{recipe_response, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::find_recipe;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = state.pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;
    Ok(Json(recipe_response(
        &mut conn,
        viewer.id(),
        recipe,
        state.config.public_base(),
    )?))
}
