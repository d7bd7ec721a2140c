#![allow(dead_code)]

use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use larder_core::{DecodedImage, IngredientLine};
use diesel::r2d2::{ConnectionManager, Pool, TestCustomizer};
use larder_server::db::{DbPool, MIGRATIONS};
use larder_server::models::{Ingredient, NewUser, Recipe, Tag, User};
use larder_server::repo::recipes::{self, RecipeFields};
use larder_server::repo::{images, users};
use larder_server::schema::{ingredients, tags};
use uuid::Uuid;

/// A migrated connection inside a transaction that is never committed, or
/// `None` when `TEST_DATABASE_URL` is not set.
pub fn test_connection() -> Option<PgConnection> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let mut conn = PgConnection::establish(&url).expect("Failed to connect to TEST_DATABASE_URL");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
    conn.begin_test_transaction()
        .expect("Failed to begin test transaction");
    Some(conn)
}

/// A single-connection pool whose connection stays inside one uncommitted
/// transaction, so every request made through it sees the same test data.
pub fn test_pool() -> Option<DbPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let mut conn = PgConnection::establish(&url).expect("Failed to connect to TEST_DATABASE_URL");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    let pool = Pool::builder()
        .max_size(1)
        .connection_customizer(Box::new(TestCustomizer))
        .build(ConnectionManager::<PgConnection>::new(url))
        .expect("Failed to build test pool");
    Some(pool)
}

pub fn user(conn: &mut PgConnection) -> User {
    let handle = format!("cook_{}", Uuid::new_v4().simple());
    let email = format!("{handle}@example.com");
    users::insert_user(
        conn,
        &NewUser {
            email: &email,
            username: &handle,
            first_name: "Test",
            last_name: "Cook",
            password_hash: "not-a-real-hash",
        },
    )
    .expect("insert user")
}

pub fn tag(conn: &mut PgConnection, slug_prefix: &str) -> Tag {
    let slug = format!("{slug_prefix}-{}", Uuid::new_v4().simple());
    diesel::insert_into(tags::table)
        .values((tags::name.eq(&slug), tags::slug.eq(&slug)))
        .returning(Tag::as_returning())
        .get_result(conn)
        .expect("insert tag")
}

pub fn ingredient(conn: &mut PgConnection, name: &str, unit: &str) -> Ingredient {
    diesel::insert_into(ingredients::table)
        .values((
            ingredients::name.eq(name),
            ingredients::measurement_unit.eq(unit),
        ))
        .returning(Ingredient::as_returning())
        .get_result(conn)
        .expect("insert ingredient")
}

pub fn image() -> DecodedImage {
    DecodedImage {
        content_type: "image/png".to_string(),
        data: vec![0x89, b'P', b'N', b'G'],
    }
}

pub fn line(ingredient: &Ingredient, amount: i32) -> IngredientLine {
    IngredientLine {
        ingredient_id: ingredient.id,
        amount,
    }
}

/// Store a recipe the way the create endpoint does.
pub fn recipe(
    conn: &mut PgConnection,
    author: &User,
    name: &str,
    tag_ids: &[Uuid],
    lines: &[IngredientLine],
) -> Recipe {
    let image_id = images::insert_image(conn, &image()).expect("insert image");
    let recipe = recipes::insert_recipe(
        conn,
        &RecipeFields {
            author_id: author.id,
            name,
            text: "Mix everything.",
            image_id,
            cooking_time: 20,
        },
    )
    .expect("insert recipe");
    recipes::replace_children(conn, recipe.id, tag_ids, lines).expect("insert children");
    recipe
}
