use crate::schema::{
    images, ingredients, recipe_ingredients, recipe_tags, recipes, sessions, tags, users,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub avatar_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

/// Stored image blob. Recipe images and user avatars both live here.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Image {
    pub id: Uuid,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Insertable)]
#[diesel(table_name = images)]
pub struct NewImage<'a> {
    pub content_type: &'a str,
    pub data: &'a [u8],
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image_id: Uuid,
    pub cooking_time: i32,
    pub short_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = recipes)]
pub struct NewRecipe<'a> {
    pub author_id: Uuid,
    pub name: &'a str,
    pub text: &'a str,
    pub image_id: Uuid,
    pub cooking_time: i32,
    pub short_link: &'a str,
}

/// Scalar recipe columns touched by an update; `None` keeps the stored value.
#[derive(AsChangeset, Default)]
#[diesel(table_name = recipes)]
pub struct RecipeChanges<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub image_id: Option<Uuid>,
    pub cooking_time: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount: i32,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: Uuid,
    pub tag_id: Uuid,
}
