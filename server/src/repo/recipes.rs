//! The recipe aggregate: the recipe row plus its tag and ingredient lines.

use std::collections::HashMap;

use crate::db::is_unique_violation;
use crate::models::{
    Ingredient, NewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe, RecipeChanges, Tag, User,
};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart_items, tags,
    users,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use larder_core::short_link::{self, MAX_ATTEMPTS};
use larder_core::{CartLine, EdgeScope, IngredientLine, PageRequest};
use uuid::Uuid;

pub const NAME_CONSTRAINT: &str = "unique_recipe_author_name";
pub const SHORT_LINK_CONSTRAINT: &str = "unique_recipe_short_link";

/// Scalar columns of a new recipe; the short link is generated on insert.
pub struct RecipeFields<'a> {
    pub author_id: Uuid,
    pub name: &'a str,
    pub text: &'a str,
    pub image_id: Uuid,
    pub cooking_time: i32,
}

/// Predicate for the recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<Uuid>,
    /// `Some` restricts to recipes carrying any of these tags; an empty
    /// list therefore matches nothing.
    pub tag_ids: Option<Vec<Uuid>>,
    pub favorited: EdgeScope,
    pub in_cart: EdgeScope,
}

impl Default for RecipeFilter {
    fn default() -> Self {
        Self {
            author: None,
            tag_ids: None,
            favorited: EdgeScope::Any,
            in_cart: EdgeScope::Any,
        }
    }
}

impl RecipeFilter {
    fn matches_nothing(&self) -> bool {
        self.favorited == EdgeScope::Nothing
            || self.in_cart == EdgeScope::Nothing
            || self.tag_ids.as_ref().is_some_and(Vec::is_empty)
    }

    fn apply<'a>(&'a self) -> recipes::BoxedQuery<'a, Pg> {
        let mut query = recipes::table.into_boxed();

        if let Some(author) = self.author {
            query = query.filter(recipes::author_id.eq(author));
        }
        if let Some(tag_ids) = &self.tag_ids {
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .filter(recipe_tags::tag_id.eq_any(tag_ids))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if let EdgeScope::LinkedTo(user_id) = self.favorited {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user_id))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if let EdgeScope::LinkedTo(user_id) = self.in_cart {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_cart_items::table
                        .filter(shopping_cart_items::user_id.eq(user_id))
                        .select(shopping_cart_items::recipe_id),
                ),
            );
        }

        query
    }
}

/// A recipe with everything its read shape needs.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<(Ingredient, i32)>,
}

pub fn find_recipe(conn: &mut PgConnection, id: Uuid) -> QueryResult<Recipe> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
}

pub fn find_by_short_link(conn: &mut PgConnection, token: &str) -> QueryResult<Option<Uuid>> {
    recipes::table
        .filter(recipes::short_link.eq(token))
        .select(recipes::id)
        .first(conn)
        .optional()
}

/// Insert the recipe row, retrying with a fresh short link when the
/// generated one is already taken.
pub fn insert_recipe(conn: &mut PgConnection, fields: &RecipeFields<'_>) -> QueryResult<Recipe> {
    let mut rng = rand::thread_rng();
    let mut attempt = 1;
    loop {
        let token = short_link::generate_token(&mut rng);
        let new_recipe = NewRecipe {
            author_id: fields.author_id,
            name: fields.name,
            text: fields.text,
            image_id: fields.image_id,
            cooking_time: fields.cooking_time,
            short_link: &token,
        };

        // Savepoint, so a collision does not abort the caller's transaction.
        let result = conn.transaction(|conn| {
            diesel::insert_into(recipes::table)
                .values(&new_recipe)
                .returning(Recipe::as_returning())
                .get_result(conn)
        });

        match result {
            Err(e) if attempt < MAX_ATTEMPTS && is_unique_violation(&e, Some(SHORT_LINK_CONSTRAINT)) => {
                tracing::warn!(attempt, "Short link collision, retrying");
                attempt += 1;
            }
            other => return other,
        }
    }
}

pub fn update_recipe(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    changes: &RecipeChanges<'_>,
) -> QueryResult<Recipe> {
    diesel::update(recipes::table.find(recipe_id))
        .set(changes)
        .returning(Recipe::as_returning())
        .get_result(conn)
}

/// Replace the tag set and ingredient lines. Line order is kept in `position`.
pub fn replace_children(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    tag_ids: &[Uuid],
    lines: &[IngredientLine],
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let new_tags: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&new_tags)
        .execute(conn)?;

    let new_lines: Vec<NewRecipeIngredient> = lines
        .iter()
        .zip(0..)
        .map(|(line, position)| NewRecipeIngredient {
            recipe_id,
            ingredient_id: line.ingredient_id,
            amount: line.amount,
            position,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&new_lines)
        .execute(conn)?;

    Ok(())
}

/// Delete the recipe (child rows and edges cascade) and its image.
pub fn delete_recipe(conn: &mut PgConnection, recipe: &Recipe) -> QueryResult<()> {
    diesel::delete(recipes::table.find(recipe.id)).execute(conn)?;
    super::images::delete_image(conn, recipe.image_id)?;
    Ok(())
}

/// One page of recipes matching `filter`, newest first, plus the total count.
pub fn list_recipes(
    conn: &mut PgConnection,
    filter: &RecipeFilter,
    page: &PageRequest,
) -> QueryResult<(Vec<Recipe>, i64)> {
    if filter.matches_nothing() {
        return Ok((Vec::new(), 0));
    }

    let total: i64 = filter.apply().count().get_result(conn)?;
    let rows = filter
        .apply()
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .limit(page.limit)
        .offset(page.offset())
        .select(Recipe::as_select())
        .load(conn)?;

    Ok((rows, total))
}

/// Recipes of each author, newest first.
pub fn recipes_by_authors(
    conn: &mut PgConnection,
    author_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, Vec<Recipe>>> {
    let rows = recipes::table
        .filter(recipes::author_id.eq_any(author_ids))
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .select(Recipe::as_select())
        .load(conn)?;

    let mut by_author: HashMap<Uuid, Vec<Recipe>> = HashMap::new();
    for recipe in rows {
        by_author.entry(recipe.author_id).or_default().push(recipe);
    }
    Ok(by_author)
}

/// Attach authors, tags and ingredient lines, keeping the input order.
pub fn load_details(
    conn: &mut PgConnection,
    recipes: Vec<Recipe>,
) -> QueryResult<Vec<RecipeDetails>> {
    let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author_id).collect();

    let authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(conn)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    let tag_rows: Vec<(Uuid, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }

    let mut lines_by_recipe: HashMap<Uuid, Vec<(Ingredient, i32)>> = HashMap::new();
    let line_rows: Vec<(Uuid, Ingredient, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(recipe_ingredients::position.asc())
        .select((
            recipe_ingredients::recipe_id,
            Ingredient::as_select(),
            recipe_ingredients::amount,
        ))
        .load(conn)?;
    for (recipe_id, ingredient, amount) in line_rows {
        lines_by_recipe
            .entry(recipe_id)
            .or_default()
            .push((ingredient, amount));
    }

    recipes
        .into_iter()
        .map(|recipe| -> QueryResult<RecipeDetails> {
            let author = authors
                .get(&recipe.author_id)
                .cloned()
                .ok_or(diesel::result::Error::NotFound)?;
            Ok(RecipeDetails {
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                ingredients: lines_by_recipe.remove(&recipe.id).unwrap_or_default(),
                author,
                recipe,
            })
        })
        .collect()
}

/// Every ingredient line of every recipe in the user's shopping cart.
pub fn cart_lines(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<CartLine>> {
    let rows: Vec<(String, String, i32)> = shopping_cart_items::table
        .inner_join(
            recipe_ingredients::table
                .on(recipe_ingredients::recipe_id.eq(shopping_cart_items::recipe_id)),
        )
        .inner_join(ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)))
        .filter(shopping_cart_items::user_id.eq(user_id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, amount)| CartLine {
            name,
            measurement_unit,
            amount: i64::from(amount),
        })
        .collect())
}
