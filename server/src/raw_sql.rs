//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! User input is ALWAYS passed via `.bind()` parameters, never interpolated.

/// Case-insensitive match on `users.email`, backed by the
/// `unique_user_email` index on `LOWER(email)`.
///
/// # Why raw SQL?
/// Diesel has no built-in `LOWER()`.
#[macro_export]
macro_rules! email_matches {
    ($email:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(users.email) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($email)
            .sql(")")
    };
}

/// `%query%` pattern for `ILIKE`, with the pattern metacharacters escaped.
pub fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
