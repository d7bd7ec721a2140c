//! Read shapes returned by the API, and their assembly from stored rows.
//!
//! Writes always read back through these builders, so a created or
//! updated recipe looks exactly like one fetched with `GET`.

use std::collections::HashSet;

use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Recipe, Tag, User};
use crate::repo::recipes::{load_details, RecipeDetails};
use crate::repo::{follows, RecipeEdge};

pub fn image_url(public_base: &str, image_id: Uuid) -> String {
    format!("{}/api/images/{}", public_base, image_id)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user. Always false for anonymous callers.
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn new(user: &User, is_subscribed: bool, public_base: &str) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: user.avatar_id.map(|id| image_url(public_base, id)),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeShortResponse {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeShortResponse {
    pub fn new(recipe: &Recipe, public_base: &str) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: image_url(public_base, recipe.image_id),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: i64,
}

impl SubscriptionResponse {
    /// `recipes` newest first; `recipes_limit` truncates the embedded list
    /// but not `recipes_count`.
    pub fn new(
        user: &User,
        recipes: &[Recipe],
        recipes_limit: Option<usize>,
        public_base: &str,
    ) -> Self {
        let shown = recipes_limit.unwrap_or(recipes.len()).min(recipes.len());
        Self {
            user: UserResponse::new(user, true, public_base),
            recipes: recipes[..shown]
                .iter()
                .map(|recipe| RecipeShortResponse::new(recipe, public_base))
                .collect(),
            recipes_count: recipes.len() as i64,
        }
    }
}

/// What the caller has linked among a batch of recipes and authors.
#[derive(Debug, Default)]
pub struct ViewerLinks {
    favorites: HashSet<Uuid>,
    cart: HashSet<Uuid>,
    following: HashSet<Uuid>,
}

impl ViewerLinks {
    pub fn load(
        conn: &mut PgConnection,
        viewer: Option<Uuid>,
        recipe_ids: &[Uuid],
        author_ids: &[Uuid],
    ) -> QueryResult<Self> {
        let Some(viewer) = viewer else {
            return Ok(Self::default());
        };
        Ok(Self {
            favorites: RecipeEdge::Favorite.linked_among(conn, viewer, recipe_ids)?,
            cart: RecipeEdge::ShoppingCart.linked_among(conn, viewer, recipe_ids)?,
            following: follows::followed_among(conn, viewer, author_ids)?,
        })
    }

    pub fn follows(&self, user_id: &Uuid) -> bool {
        self.following.contains(user_id)
    }
}

impl RecipeResponse {
    pub fn new(details: RecipeDetails, links: &ViewerLinks, public_base: &str) -> Self {
        let RecipeDetails {
            recipe,
            author,
            tags,
            ingredients,
        } = details;

        Self {
            id: recipe.id,
            tags,
            author: UserResponse::new(&author, links.follows(&author.id), public_base),
            ingredients: ingredients
                .into_iter()
                .map(|(ingredient, amount)| RecipeIngredientResponse {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount,
                })
                .collect(),
            is_favorited: links.favorites.contains(&recipe.id),
            is_in_shopping_cart: links.cart.contains(&recipe.id),
            image: image_url(public_base, recipe.image_id),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Full read shapes for `recipes`, in the given order.
pub fn recipe_responses(
    conn: &mut PgConnection,
    viewer: Option<Uuid>,
    recipes: Vec<Recipe>,
    public_base: &str,
) -> QueryResult<Vec<RecipeResponse>> {
    let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author_id).collect();
    let links = ViewerLinks::load(conn, viewer, &recipe_ids, &author_ids)?;

    Ok(load_details(conn, recipes)?
        .into_iter()
        .map(|details| RecipeResponse::new(details, &links, public_base))
        .collect())
}

pub fn recipe_response(
    conn: &mut PgConnection,
    viewer: Option<Uuid>,
    recipe: Recipe,
    public_base: &str,
) -> QueryResult<RecipeResponse> {
    recipe_responses(conn, viewer, vec![recipe], public_base)?
        .pop()
        .ok_or(diesel::result::Error::NotFound)
}

pub fn user_responses(
    conn: &mut PgConnection,
    viewer: Option<Uuid>,
    users: &[User],
    public_base: &str,
) -> QueryResult<Vec<UserResponse>> {
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let following = match viewer {
        Some(viewer) => follows::followed_among(conn, viewer, &ids)?,
        None => HashSet::new(),
    };
    Ok(users
        .iter()
        .map(|user| UserResponse::new(user, following.contains(&user.id), public_base))
        .collect())
}
