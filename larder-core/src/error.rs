use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// A single rejected input. Every variant knows which request field it
/// belongs to so the HTTP layer can report field-level detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least one tag is required")]
    MissingTags,

    #[error("Tags must not repeat")]
    DuplicateTags,

    #[error("Tag {0} does not exist")]
    UnknownTag(Uuid),

    #[error("At least one ingredient is required")]
    MissingIngredients,

    #[error("Ingredients must not repeat")]
    DuplicateIngredients,

    #[error("Ingredient {0} does not exist")]
    UnknownIngredient(Uuid),

    #[error("Amount of ingredient {ingredient} must be at least {min}")]
    AmountBelowMinimum { ingredient: Uuid, min: i32 },

    #[error("Cooking time must be at least {min} minute(s)")]
    CookingTimeBelowMinimum { min: i32 },

    #[error("This field is required")]
    Missing { field: &'static str },

    #[error("This field cannot be blank")]
    Blank { field: &'static str },

    #[error("Ensure this field has no more than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid image: {reason}")]
    InvalidImage { field: &'static str, reason: String },

    #[error("Username may only contain letters, digits and @/./+/-/_ characters")]
    InvalidUsername,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("You cannot subscribe to yourself")]
    SelfFollow,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Invalid value {value:?}")]
    InvalidParameter { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the request field this error is reported under.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingTags
            | ValidationError::DuplicateTags
            | ValidationError::UnknownTag(_) => "tags",
            ValidationError::MissingIngredients
            | ValidationError::DuplicateIngredients
            | ValidationError::UnknownIngredient(_)
            | ValidationError::AmountBelowMinimum { .. } => "ingredients",
            ValidationError::CookingTimeBelowMinimum { .. } => "cooking_time",
            ValidationError::InvalidUsername => "username",
            ValidationError::InvalidEmail => "email",
            ValidationError::SelfFollow => "author",
            ValidationError::WrongPassword => "current_password",
            ValidationError::Missing { field }
            | ValidationError::Blank { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidImage { field, .. }
            | ValidationError::InvalidParameter { field, .. } => field,
        }
    }
}

/// Every validation failure found in one request.
///
/// Checks push into this collection instead of returning on the first
/// problem, so a client sees all rejected fields at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    /// `Ok(())` when nothing was collected, otherwise the collection itself.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Messages grouped by field, in field-name order.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut fields: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.0 {
            fields.entry(error.field()).or_default().push(error.to_string());
        }
        fields
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field(), e))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Expected a data URI of the form data:image/<format>;base64,<payload>")]
    NotDataUri,

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Could not detect image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(ValidationError::DuplicateTags.field(), "tags");
        assert_eq!(
            ValidationError::UnknownIngredient(Uuid::nil()).field(),
            "ingredients"
        );
        assert_eq!(
            ValidationError::CookingTimeBelowMinimum { min: 1 }.field(),
            "cooking_time"
        );
        assert_eq!(ValidationError::Blank { field: "text" }.field(), "text");
    }

    #[test]
    fn test_by_field_groups_messages() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::MissingTags);
        errors.push(ValidationError::DuplicateIngredients);
        errors.push(ValidationError::MissingIngredients);

        let fields = errors.by_field();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["tags"], vec!["At least one tag is required"]);
        assert_eq!(fields["ingredients"].len(), 2);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let errors = ValidationErrors::from(ValidationError::SelfFollow);
        let err = errors.into_result().unwrap_err();
        assert!(err.contains(&ValidationError::SelfFollow));
        assert_eq!(err.to_string(), "author: You cannot subscribe to yourself");
    }
}
