//! Account field rules for sign-up and password changes.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ValidationError, ValidationErrors};

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_PERSON_NAME_LENGTH: usize = 150;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username pattern"));

#[derive(Debug, Clone, Copy)]
pub struct SignupDraft<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

pub fn validate_signup(draft: &SignupDraft<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_email(draft.email) {
        errors.push(e);
    }
    if let Err(e) = validate_username(draft.username) {
        errors.push(e);
    }
    for (field, value) in [
        ("first_name", draft.first_name),
        ("last_name", draft.last_name),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::Blank { field });
        } else if value.chars().count() > MAX_PERSON_NAME_LENGTH {
            errors.push(ValidationError::TooLong {
                field,
                max: MAX_PERSON_NAME_LENGTH,
            });
        }
    }
    if let Err(e) = validate_password("password", draft.password) {
        errors.push(e);
    }

    errors
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Blank { field: "username" });
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "username",
            max: MAX_USERNAME_LENGTH,
        });
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(())
}

/// Shape check only: one `@`, non-empty local part, dotted domain, no spaces.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Blank { field: "email" });
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_EMAIL_LENGTH,
        });
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(field: &'static str, password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(())
    }
}

/// Lowercase the domain part, keep the local part as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_charset() {
        assert!(validate_username("chef.anna+1@home").is_ok());
        assert!(validate_username("повар_42").is_ok());
        assert_eq!(
            validate_username("no spaces"),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(
            validate_username("semi;colon"),
            Err(ValidationError::InvalidUsername)
        );
        assert!(matches!(
            validate_username(&"a".repeat(151)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("cook@example.com").is_ok());
        assert_eq!(validate_email("cook"), Err(ValidationError::InvalidEmail));
        assert_eq!(
            validate_email("cook@localhost"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_email("a b@example.com"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Cook@Example.COM "), "Cook@example.com");
    }

    #[test]
    fn test_signup_collects_all_errors() {
        let errors = validate_signup(&SignupDraft {
            email: "nope",
            username: "bad name",
            first_name: "",
            last_name: "Ramsay",
            password: "",
        });
        let fields = errors.by_field();
        assert_eq!(
            fields.keys().copied().collect::<Vec<_>>(),
            vec!["email", "first_name", "password", "username"]
        );
    }
}
