//! Write-path rules for the recipe aggregate.
//!
//! Catalog existence (unknown tag or ingredient ids) needs the database, so
//! the server runs [`validate_draft`] first and then appends the results of
//! [`unknown_ids`] to the same [`ValidationErrors`].

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{ValidationError, ValidationErrors};

pub const MAX_NAME_LENGTH: usize = 256;

/// Lower bounds applied to numeric recipe fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_amount: i32,
    pub min_cooking_time: i32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_amount: 1,
            min_cooking_time: 1,
        }
    }
}

/// One `(ingredient, amount)` pair as submitted by the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientLine {
    pub ingredient_id: Uuid,
    pub amount: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    /// Scalar fields may be omitted and keep their stored values. Tags and
    /// ingredients are still required because they are always replaced.
    Update,
}

/// Borrowed view of a create/update request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeDraft<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub cooking_time: Option<i32>,
    pub tags: Option<&'a [Uuid]>,
    pub ingredients: Option<&'a [IngredientLine]>,
}

pub fn validate_draft(
    draft: &RecipeDraft<'_>,
    limits: &Limits,
    mode: WriteMode,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match draft.name {
        Some(name) if name.trim().is_empty() => {
            errors.push(ValidationError::Blank { field: "name" })
        }
        Some(name) if name.chars().count() > MAX_NAME_LENGTH => {
            errors.push(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LENGTH,
            })
        }
        Some(_) => {}
        None if mode == WriteMode::Create => {
            errors.push(ValidationError::Missing { field: "name" })
        }
        None => {}
    }

    match draft.text {
        Some(text) if text.trim().is_empty() => {
            errors.push(ValidationError::Blank { field: "text" })
        }
        Some(_) => {}
        None if mode == WriteMode::Create => {
            errors.push(ValidationError::Missing { field: "text" })
        }
        None => {}
    }

    match draft.cooking_time {
        Some(minutes) if minutes < limits.min_cooking_time => {
            errors.push(ValidationError::CookingTimeBelowMinimum {
                min: limits.min_cooking_time,
            })
        }
        Some(_) => {}
        None if mode == WriteMode::Create => errors.push(ValidationError::Missing {
            field: "cooking_time",
        }),
        None => {}
    }

    errors.extend(validate_tags(draft.tags.unwrap_or_default()));
    errors.extend(validate_ingredient_lines(
        draft.ingredients.unwrap_or_default(),
        limits,
    ));

    errors
}

/// Tags must be a non-empty list of distinct ids.
pub fn validate_tags(tags: &[Uuid]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if tags.is_empty() {
        errors.push(ValidationError::MissingTags);
    } else if has_duplicates(tags.iter()) {
        errors.push(ValidationError::DuplicateTags);
    }
    errors
}

/// Ingredient lines must be non-empty, reference each ingredient once, and
/// carry amounts at or above the configured minimum.
pub fn validate_ingredient_lines(lines: &[IngredientLine], limits: &Limits) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if lines.is_empty() {
        errors.push(ValidationError::MissingIngredients);
        return errors;
    }

    if has_duplicates(lines.iter().map(|line| &line.ingredient_id)) {
        errors.push(ValidationError::DuplicateIngredients);
    }

    for line in lines {
        if line.amount < limits.min_amount {
            errors.push(ValidationError::AmountBelowMinimum {
                ingredient: line.ingredient_id,
                min: limits.min_amount,
            });
        }
    }

    errors
}

/// Ids from `requested` missing in `known`, in request order, each reported once.
pub fn unknown_ids(requested: &[Uuid], known: &HashSet<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter(|id| !known.contains(id) && seen.insert(**id))
        .copied()
        .collect()
}

fn has_duplicates<'a>(ids: impl Iterator<Item = &'a Uuid>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().any(|id| !seen.insert(id))
}
