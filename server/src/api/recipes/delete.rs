use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repo::recipes;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use uuid::Uuid;

use super::find_own_recipe;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.pool.get()?;
    let recipe = find_own_recipe(&mut conn, id, user.id)?;

    conn.transaction(|conn| recipes::delete_recipe(conn, &recipe))?;
    tracing::info!(recipe_id = %recipe.id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
