pub mod create;
pub mod delete;
pub mod download;
pub mod edges;
pub mod get;
pub mod get_link;
pub mod list;
pub mod update;

use crate::api::extract::UPLOAD_BODY_LIMIT;
use crate::db::is_unique_violation;
use crate::error::ApiError;
use crate::models::Recipe;
use crate::repo::{catalog, recipes};
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use diesel::PgConnection;
use larder_core::recipe::{unknown_ids, validate_draft};
use larder_core::{
    decode_data_uri, DecodedImage, IngredientLine, Limits, RecipeDraft, ValidationError, WriteMode,
};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_recipes)
                .post(create::create_recipe)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/download_shopping_cart",
            get(download::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/{id}/get-link", get(get_link::get_link))
        .route(
            "/{id}/favorite",
            post(edges::add_favorite).delete(edges::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(edges::add_to_shopping_cart).delete(edges::remove_from_shopping_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        get_link::get_link,
        edges::add_favorite,
        edges::remove_favorite,
        edges::add_to_shopping_cart,
        edges::remove_from_shopping_cart,
        download::download_shopping_cart,
    ),
    components(schemas(
        RecipeWriteRequest,
        IngredientAmount,
        get_link::ShortLinkResponse,
        crate::api::views::RecipeResponse,
        crate::api::views::RecipeIngredientResponse,
        crate::api::views::RecipeShortResponse,
    ))
)]
pub struct ApiDoc;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i32,
}

/// Body of `POST /api/recipes` and `PATCH /api/recipes/{id}`.
///
/// On update, omitted scalar fields keep their stored value; `tags` and
/// `ingredients` are always required and replace the stored sets.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecipeWriteRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    /// `data:image/<format>;base64,<payload>`
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<Uuid>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// A write request that passed every check.
pub struct ValidatedWrite {
    pub tags: Vec<Uuid>,
    pub lines: Vec<IngredientLine>,
    pub image: Option<DecodedImage>,
}

impl RecipeWriteRequest {
    fn lines(&self) -> Option<Vec<IngredientLine>> {
        self.ingredients.as_ref().map(|items| {
            items
                .iter()
                .map(|item| IngredientLine {
                    ingredient_id: item.id,
                    amount: item.amount,
                })
                .collect()
        })
    }

    /// Collect every problem with the request: field rules, the image, and
    /// tag or ingredient ids missing from the catalog.
    pub fn validate(
        &self,
        conn: &mut PgConnection,
        limits: &Limits,
        mode: WriteMode,
    ) -> Result<ValidatedWrite, ApiError> {
        let lines = self.lines();
        let draft = RecipeDraft {
            name: self.name.as_deref(),
            text: self.text.as_deref(),
            cooking_time: self.cooking_time,
            tags: self.tags.as_deref(),
            ingredients: lines.as_deref(),
        };
        let mut errors = validate_draft(&draft, limits, mode);

        let image = match self.image.as_deref().map(str::trim) {
            Some("") => {
                errors.push(ValidationError::Blank { field: "image" });
                None
            }
            Some(data_uri) => match decode_data_uri(data_uri) {
                Ok(image) => Some(image),
                Err(e) => {
                    errors.push(ValidationError::InvalidImage {
                        field: "image",
                        reason: e.to_string(),
                    });
                    None
                }
            },
            None if mode == WriteMode::Create => {
                errors.push(ValidationError::Missing { field: "image" });
                None
            }
            None => None,
        };

        let tags = self.tags.clone().unwrap_or_default();
        let known_tags = catalog::existing_tag_ids(conn, &tags)?;
        for id in unknown_ids(&tags, &known_tags) {
            errors.push(ValidationError::UnknownTag(id));
        }

        let lines = lines.unwrap_or_default();
        let requested: Vec<Uuid> = lines.iter().map(|line| line.ingredient_id).collect();
        let known_ingredients = catalog::existing_ingredient_ids(conn, &requested)?;
        for id in unknown_ids(&requested, &known_ingredients) {
            errors.push(ValidationError::UnknownIngredient(id));
        }

        errors.into_result()?;
        Ok(ValidatedWrite { tags, lines, image })
    }
}

/// Duplicate `(author, name)` is a conflict; anything else goes through
/// the generic mapping.
pub fn map_write_error(error: diesel::result::Error) -> ApiError {
    if is_unique_violation(&error, Some(recipes::NAME_CONSTRAINT)) {
        ApiError::Conflict("You already have a recipe with this name".to_string())
    } else {
        error.into()
    }
}

pub fn find_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, ApiError> {
    recipes::find_recipe(conn, id).map_err(|e| match e {
        diesel::result::Error::NotFound => ApiError::not_found("Recipe"),
        other => other.into(),
    })
}

/// The recipe, if `user_id` wrote it.
pub fn find_own_recipe(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<Recipe, ApiError> {
    let recipe = find_recipe(conn, id)?;
    if recipe.author_id != user_id {
        return Err(ApiError::Forbidden(
            "Only the author can change this recipe".to_string(),
        ));
    }
    Ok(recipe)
}
