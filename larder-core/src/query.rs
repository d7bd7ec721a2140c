//! Recipe list parameters.
//!
//! `tags` repeats (`?tags=breakfast&tags=dinner`), so the parameters arrive
//! as raw key/value pairs instead of a flat struct.

use uuid::Uuid;

use crate::error::{ValidationError, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub author: Option<Uuid>,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl RecipeQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ValidationErrors> {
        let mut query = RecipeQuery::default();
        let mut errors = ValidationErrors::new();

        for (key, value) in pairs {
            let value = value.trim();
            // `?page=` and friends mean the parameter was left out.
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "author" => match Uuid::parse_str(value) {
                    Ok(id) => query.author = Some(id),
                    Err(_) => errors.push(invalid("author", value)),
                },
                "tags" => {
                    if !query.tags.iter().any(|t| t == value) {
                        query.tags.push(value.to_string());
                    }
                }
                "is_favorited" => match parse_flag(value) {
                    Some(flag) => query.is_favorited = Some(flag),
                    None => errors.push(invalid("is_favorited", value)),
                },
                "is_in_shopping_cart" => match parse_flag(value) {
                    Some(flag) => query.is_in_shopping_cart = Some(flag),
                    None => errors.push(invalid("is_in_shopping_cart", value)),
                },
                "page" => match value.parse() {
                    Ok(page) => query.page = Some(page),
                    Err(_) => errors.push(invalid("page", value)),
                },
                "limit" => match value.parse() {
                    Ok(limit) => query.limit = Some(limit),
                    Err(_) => errors.push(invalid("limit", value)),
                },
                _ => {}
            }
        }

        errors.into_result().map(|()| query)
    }
}

/// How a boolean "linked to me" filter restricts a recipe list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeScope {
    /// No restriction.
    Any,
    /// Only recipes linked to this user through the edge set.
    LinkedTo(Uuid),
    /// The filter was requested by an anonymous caller: nothing matches.
    Nothing,
}

impl EdgeScope {
    pub fn resolve(flag: Option<bool>, viewer: Option<Uuid>) -> Self {
        match (flag, viewer) {
            (Some(true), Some(user_id)) => EdgeScope::LinkedTo(user_id),
            (Some(true), None) => EdgeScope::Nothing,
            _ => EdgeScope::Any,
        }
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// `recipes_limit` on the subscriptions list: a non-negative integer
/// truncates each embedded recipe list, anything else is ignored.
pub fn parse_recipes_limit(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.trim().parse::<usize>().ok())
}

fn invalid(field: &'static str, value: &str) -> ValidationError {
    ValidationError::InvalidParameter {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(RecipeQuery::from_pairs(&[]).unwrap(), RecipeQuery::default());
    }

    #[test]
    fn test_repeated_tags() {
        let query = RecipeQuery::from_pairs(&pairs(&[
            ("tags", "breakfast"),
            ("tags", "dinner"),
            ("tags", "breakfast"),
            ("tags", ""),
        ]))
        .unwrap();
        assert_eq!(query.tags, vec!["breakfast", "dinner"]);
    }

    #[test]
    fn test_flags_and_paging() {
        let author = Uuid::new_v4();
        let author_id = author.to_string();
        let query = RecipeQuery::from_pairs(&pairs(&[
            ("author", author_id.as_str()),
            ("is_favorited", "1"),
            ("is_in_shopping_cart", "false"),
            ("page", "3"),
            ("limit", "10"),
            ("unrelated", "x"),
        ]))
        .unwrap();
        assert_eq!(query.author, Some(author));
        assert_eq!(query.is_favorited, Some(true));
        assert_eq!(query.is_in_shopping_cart, Some(false));
        assert_eq!(query.page, Some(3));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_malformed_values_are_collected() {
        let err = RecipeQuery::from_pairs(&pairs(&[
            ("author", "bob"),
            ("is_favorited", "maybe"),
            ("page", "two"),
        ]))
        .unwrap_err();
        let fields = err.by_field();
        assert!(fields.contains_key("author"));
        assert!(fields.contains_key("is_favorited"));
        assert!(fields.contains_key("page"));
    }

    #[test]
    fn test_blank_values_are_absent() {
        let query = RecipeQuery::from_pairs(&pairs(&[
            ("author", ""),
            ("is_favorited", " "),
            ("is_in_shopping_cart", ""),
            ("page", ""),
            ("limit", ""),
        ]))
        .unwrap();
        assert_eq!(query, RecipeQuery::default());
    }

    #[test]
    fn test_edge_scope_resolution() {
        let me = Uuid::new_v4();
        assert_eq!(EdgeScope::resolve(Some(true), Some(me)), EdgeScope::LinkedTo(me));
        assert_eq!(EdgeScope::resolve(Some(true), None), EdgeScope::Nothing);
        assert_eq!(EdgeScope::resolve(Some(false), Some(me)), EdgeScope::Any);
        assert_eq!(EdgeScope::resolve(Some(false), None), EdgeScope::Any);
        assert_eq!(EdgeScope::resolve(None, None), EdgeScope::Any);
    }

    #[test]
    fn test_recipes_limit() {
        assert_eq!(parse_recipes_limit(Some("3")), Some(3));
        assert_eq!(parse_recipes_limit(Some("0")), Some(0));
        assert_eq!(parse_recipes_limit(Some("-1")), None);
        assert_eq!(parse_recipes_limit(Some("lots")), None);
        assert_eq!(parse_recipes_limit(None), None);
    }
}
