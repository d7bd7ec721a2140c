//! Favorites and shopping-cart entries: two tables with the same
//! `(user_id, recipe_id)` shape and the same toggle rules.

use std::collections::HashSet;

use crate::schema::{favorites, shopping_cart_items};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeEdge {
    Favorite,
    ShoppingCart,
}

impl RecipeEdge {
    /// Human-readable name of the collection, for error messages.
    pub fn label(self) -> &'static str {
        match self {
            RecipeEdge::Favorite => "favorites",
            RecipeEdge::ShoppingCart => "shopping cart",
        }
    }

    /// Insert the edge. Returns `false` when it already existed.
    pub fn add(self, conn: &mut PgConnection, user_id: Uuid, recipe_id: Uuid) -> QueryResult<bool> {
        let inserted = match self {
            RecipeEdge::Favorite => diesel::insert_into(favorites::table)
                .values((
                    favorites::user_id.eq(user_id),
                    favorites::recipe_id.eq(recipe_id),
                ))
                .on_conflict_do_nothing()
                .execute(conn)?,
            RecipeEdge::ShoppingCart => diesel::insert_into(shopping_cart_items::table)
                .values((
                    shopping_cart_items::user_id.eq(user_id),
                    shopping_cart_items::recipe_id.eq(recipe_id),
                ))
                .on_conflict_do_nothing()
                .execute(conn)?,
        };
        Ok(inserted > 0)
    }

    /// Remove the edge. Returns `false` when there was none.
    pub fn remove(
        self,
        conn: &mut PgConnection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> QueryResult<bool> {
        let deleted = match self {
            RecipeEdge::Favorite => diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?,
            RecipeEdge::ShoppingCart => diesel::delete(
                shopping_cart_items::table
                    .filter(shopping_cart_items::user_id.eq(user_id))
                    .filter(shopping_cart_items::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?,
        };
        Ok(deleted > 0)
    }

    /// Which of `recipe_ids` the user has linked through this edge.
    pub fn linked_among(
        self,
        conn: &mut PgConnection,
        user_id: Uuid,
        recipe_ids: &[Uuid],
    ) -> QueryResult<HashSet<Uuid>> {
        let found: Vec<Uuid> = match self {
            RecipeEdge::Favorite => favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq_any(recipe_ids))
                .select(favorites::recipe_id)
                .load(conn)?,
            RecipeEdge::ShoppingCart => shopping_cart_items::table
                .filter(shopping_cart_items::user_id.eq(user_id))
                .filter(shopping_cart_items::recipe_id.eq_any(recipe_ids))
                .select(shopping_cart_items::recipe_id)
                .load(conn)?,
        };
        Ok(found.into_iter().collect())
    }
}
