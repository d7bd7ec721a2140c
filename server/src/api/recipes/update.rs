use crate::api::views::{recipe_response, RecipeResponse};
use crate::api::extract::JsonBody;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::RecipeChanges;
use crate::repo::{images, recipes};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use larder_core::WriteMode;
use uuid::Uuid;

use super::{find_own_recipe, map_write_error, RecipeWriteRequest};

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeWriteRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "A recipe with this name already exists", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<RecipeWriteRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = state.pool.get()?;
    let existing = find_own_recipe(&mut conn, id, user.id)?;
    let write = request.validate(&mut conn, &state.config.limits, WriteMode::Update)?;

    let recipe = conn
        .transaction::<_, diesel::result::Error, _>(|conn| {
            let image_id = match &write.image {
                Some(image) => Some(images::insert_image(conn, image)?),
                None => None,
            };

            let changes = RecipeChanges {
                name: request.name.as_deref().map(str::trim),
                text: request.text.as_deref(),
                image_id,
                cooking_time: request.cooking_time,
                updated_at: Some(Utc::now()),
            };
            let recipe = recipes::update_recipe(conn, existing.id, &changes)?;
            recipes::replace_children(conn, recipe.id, &write.tags, &write.lines)?;

            if image_id.is_some() {
                images::delete_image(conn, existing.image_id)?;
            }
            Ok(recipe)
        })
        .map_err(map_write_error)?;

    tracing::info!(recipe_id = %recipe.id, "Recipe updated");

    Ok(Json(recipe_response(
        &mut conn,
        Some(user.id),
        recipe,
        state.config.public_base(),
    )?))
}
