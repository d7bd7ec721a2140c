use crate::api::views::{recipe_response, RecipeResponse};
use crate::api::extract::JsonBody;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repo::images;
use crate::repo::recipes::{self, RecipeFields};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use larder_core::WriteMode;

use super::{map_write_error, RecipeWriteRequest};

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeWriteRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "A recipe with this name already exists", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RecipeWriteRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let mut conn = state.pool.get()?;
    let write = request.validate(&mut conn, &state.config.limits, WriteMode::Create)?;

    // Validation guarantees these for a create.
    let (Some(name), Some(text), Some(cooking_time), Some(image)) = (
        request.name.as_deref(),
        request.text.as_deref(),
        request.cooking_time,
        write.image.as_ref(),
    ) else {
        return Err(ApiError::Internal(
            "Validated recipe is missing a required field".to_string(),
        ));
    };

    // Recipe row, image and child rows are written together or not at all
    let recipe = conn
        .transaction::<_, diesel::result::Error, _>(|conn| {
            let image_id = images::insert_image(conn, image)?;
            let recipe = recipes::insert_recipe(
                conn,
                &RecipeFields {
                    author_id: user.id,
                    name: name.trim(),
                    text,
                    image_id,
                    cooking_time,
                },
            )?;
            recipes::replace_children(conn, recipe.id, &write.tags, &write.lines)?;
            Ok(recipe)
        })
        .map_err(map_write_error)?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.id, "Recipe created");

    let response = recipe_response(
        &mut conn,
        Some(user.id),
        recipe,
        state.config.public_base(),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}
