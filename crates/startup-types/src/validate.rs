//! Field validation shared by request payloads and dataset records

use thiserror::Error;

/// Field constraint violation.
///
/// Display output is the message returned to API clients, so it names the
/// offending field and the accepted range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("{field} must be greater than 0, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("invalid {field} '{value}', expected one of: {expected}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("invalid request body: {0}")]
    Malformed(String),

    /// Path segment or query string that does not parse
    #[error("invalid request parameter: {0}")]
    InvalidParameter(String),

    #[error("product {index} ('{name}'): {reason}")]
    InvalidProduct {
        index: usize,
        name: String,
        reason: String,
    },

    #[error("{}: {reason}", describe_record(.index, .name))]
    InvalidRecord {
        index: usize,
        name: Option<String>,
        reason: String,
    },
}

impl ValidationError {
    pub fn invalid_choice<T: std::fmt::Display>(
        field: &'static str,
        value: &str,
        choices: &[T],
    ) -> Self {
        ValidationError::InvalidChoice {
            field,
            value: value.to_string(),
            expected: choices
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn describe_record(index: &usize, name: &Option<String>) -> String {
    match name {
        Some(name) => format!("record {} ('{}')", index, name),
        None => format!("record {}", index),
    }
}

/// Types that check their own field constraints before reaching storage
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Required text: non-empty (after trimming) and at most `max` characters.
pub fn required_text(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    max_chars(field, value, max)
}

/// Length limit counted in characters, not bytes.
pub fn max_chars(field: &'static str, value: &str, max: Option<usize>) -> Result<(), ValidationError> {
    match max {
        Some(max) if value.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

pub fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

pub fn positive(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}
