//! Input validation for prompt submissions and query parameters.

use thiserror::Error;

use crate::moderation::PromptStatus;
use crate::taxonomy::{Category, Department};

/// Validation errors for user-supplied input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("field '{0}' is required")]
    MissingField(&'static str),

    /// A provided field is blank.
    #[error("field '{0}' cannot be blank")]
    BlankField(&'static str),

    /// Unknown department identifier.
    #[error("unknown department: {0}")]
    InvalidDepartment(String),

    /// Unknown category identifier.
    #[error("unknown category: {0}")]
    InvalidCategory(String),

    /// Unknown moderation status.
    #[error("unknown status: {0}")]
    InvalidStatus(String),

    /// Prompt id is not numeric.
    #[error("invalid prompt id: {0}")]
    InvalidId(String),

    /// An update with nothing to change.
    #[error("at least one field must be provided")]
    EmptyUpdate,
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Require a non-blank text field, returning it trimmed.
pub fn required_text(field: &'static str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Validate an optional text field: absent is fine, blank is not.
pub fn optional_text(field: &'static str, value: Option<&str>) -> Result<Option<String>> {
    match value.map(str::trim) {
        None => Ok(None),
        Some("") => Err(ValidationError::BlankField(field)),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Parse a department identifier.
pub fn parse_department(value: &str) -> Result<Department> {
    Department::parse(value.trim())
        .ok_or_else(|| ValidationError::InvalidDepartment(value.to_string()))
}

/// Parse a category identifier.
pub fn parse_category(value: &str) -> Result<Category> {
    Category::parse(value.trim()).ok_or_else(|| ValidationError::InvalidCategory(value.to_string()))
}

/// Parse a moderation status.
pub fn parse_status(value: &str) -> Result<PromptStatus> {
    PromptStatus::parse(value.trim())
        .ok_or_else(|| ValidationError::InvalidStatus(value.to_string()))
}

/// Parse a prompt id from a path segment.
pub fn parse_prompt_id(value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidId(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("title", Some("  Hi ")).unwrap(), "Hi");
    }

    #[test]
    fn required_text_rejects_missing_and_blank() {
        assert_eq!(
            required_text("title", None),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            required_text("title", Some("   ")),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn optional_text_allows_absent_but_not_blank() {
        assert_eq!(optional_text("title", None).unwrap(), None);
        assert_eq!(
            optional_text("title", Some("x")).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(
            optional_text("title", Some(" ")),
            Err(ValidationError::BlankField("title"))
        );
    }

    #[test]
    fn parse_taxonomies() {
        assert_eq!(parse_department("sales").unwrap(), Department::Sales);
        assert!(matches!(
            parse_department("legal"),
            Err(ValidationError::InvalidDepartment(_))
        ));
        assert_eq!(parse_category("email").unwrap(), Category::Email);
        assert_eq!(parse_status("rejected").unwrap(), PromptStatus::Rejected);
        assert!(parse_status("deleted").is_err());
    }

    #[test]
    fn parse_prompt_id_requires_number() {
        assert_eq!(parse_prompt_id("42").unwrap(), 42);
        assert_eq!(
            parse_prompt_id("abc"),
            Err(ValidationError::InvalidId("abc".to_string()))
        );
    }
}
