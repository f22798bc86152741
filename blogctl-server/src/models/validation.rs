//! Validation error types

use std::fmt;

/// Validation error for write payloads and query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Number outside the accepted range
    OutOfRange { field: &'static str, min: i64 },

    /// Invalid enum variant or unknown property name
    InvalidVariant { field: &'static str, value: String },

    /// Request body or query string could not be decoded
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::OutOfRange { field, min } => {
                write!(f, "{} must be at least {}", field, min)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::Malformed { reason } => write!(f, "malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim a required text field and enforce its length bound.
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 256,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 256 characters"
        );
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("review", "  nice  ", 10).unwrap(), "nice");
    }

    #[test]
    fn required_text_rejects_blank() {
        assert_eq!(
            required_text("review", "   ", 10).unwrap_err(),
            ValidationError::Empty { field: "review" }
        );
    }

    #[test]
    fn required_text_counts_chars_not_bytes() {
        // "Lulalá" is 6 chars but 7 bytes
        assert!(required_text("firstName", "Lulalá", 6).is_ok());
        assert!(required_text("firstName", "Lulalá", 5).is_err());
    }
}
