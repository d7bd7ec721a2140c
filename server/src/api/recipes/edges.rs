//! Favorite and shopping-cart toggles. Both follow the same rules: adding
//! an existing entry is a conflict, removing a missing one is rejected.

use crate::api::views::RecipeShortResponse;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::User;
use crate::repo::RecipeEdge;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::find_recipe;

fn add(
    edge: RecipeEdge,
    user: &User,
    state: &AppState,
    recipe_id: Uuid,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiError> {
    let mut conn = state.pool.get()?;
    let recipe = find_recipe(&mut conn, recipe_id)?;

    if !edge.add(&mut conn, user.id, recipe.id)? {
        return Err(ApiError::Conflict(format!(
            "Recipe is already in your {}",
            edge.label()
        )));
    }

    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::new(&recipe, state.config.public_base())),
    ))
}

fn remove(
    edge: RecipeEdge,
    user: &User,
    state: &AppState,
    recipe_id: Uuid,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.pool.get()?;
    let recipe = find_recipe(&mut conn, recipe_id)?;

    if !edge.remove(&mut conn, user.id, recipe.id)? {
        return Err(ApiError::BadRequest(format!(
            "Recipe is not in your {}",
            edge.label()
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = RecipeShortResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already a favorite", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiError> {
    add(RecipeEdge::Favorite, &user, &state, id)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 400, description = "Not a favorite", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    remove(RecipeEdge::Favorite, &user, &state, id)
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to the shopping cart", body = RecipeShortResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already in the shopping cart", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_to_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiError> {
    add(RecipeEdge::ShoppingCart, &user, &state, id)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 400, description = "Not in the shopping cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_from_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    remove(RecipeEdge::ShoppingCart, &user, &state, id)
}
