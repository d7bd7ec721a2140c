//! Read-only catalog: tags and ingredients.

use std::collections::HashSet;

use crate::models::{Ingredient, Tag};
use crate::raw_sql::contains_pattern;
use crate::schema::{ingredients, tags};
use diesel::prelude::*;
use larder_core::rank_by_name;
use uuid::Uuid;

pub fn list_tags(conn: &mut PgConnection) -> QueryResult<Vec<Tag>> {
    tags::table
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(conn)
}

pub fn get_tag(conn: &mut PgConnection, id: Uuid) -> QueryResult<Tag> {
    tags::table.find(id).select(Tag::as_select()).first(conn)
}

/// Ids of tags whose slug is in `slugs`.
pub fn tag_ids_by_slug(conn: &mut PgConnection, slugs: &[String]) -> QueryResult<Vec<Uuid>> {
    tags::table
        .filter(tags::slug.eq_any(slugs))
        .select(tags::id)
        .load(conn)
}

pub fn existing_tag_ids(conn: &mut PgConnection, ids: &[Uuid]) -> QueryResult<HashSet<Uuid>> {
    let found: Vec<Uuid> = tags::table
        .filter(tags::id.eq_any(ids))
        .select(tags::id)
        .load(conn)?;
    Ok(found.into_iter().collect())
}

/// All ingredients in name order, or, with a `name` query, the ones whose
/// name contains it with prefix matches first.
pub fn search_ingredients(
    conn: &mut PgConnection,
    name: Option<&str>,
) -> QueryResult<Vec<Ingredient>> {
    let mut query = ingredients::table
        .select(Ingredient::as_select())
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .into_boxed();

    let needle = name.map(str::trim).filter(|n| !n.is_empty());
    if let Some(needle) = needle {
        query = query.filter(ingredients::name.ilike(contains_pattern(needle)));
    }

    let rows = query.load(conn)?;
    Ok(match needle {
        Some(needle) => rank_by_name(rows, needle, |i: &Ingredient| i.name.as_str()),
        None => rows,
    })
}

pub fn get_ingredient(conn: &mut PgConnection, id: Uuid) -> QueryResult<Ingredient> {
    ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(conn)
}

pub fn existing_ingredient_ids(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> QueryResult<HashSet<Uuid>> {
    let found: Vec<Uuid> = ingredients::table
        .filter(ingredients::id.eq_any(ids))
        .select(ingredients::id)
        .load(conn)?;
    Ok(found.into_iter().collect())
}
