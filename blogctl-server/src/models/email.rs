//! Email address validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for email addresses (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

/// One `@`, a non-empty local part, and a dotted domain without whitespace.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("invalid email regex")
});

/// Validated, well-formed email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create a new email, validating its shape.
    ///
    /// # Example
    /// ```
    /// use blogctl_server::models::Email;
    ///
    /// assert!(Email::new("j_snow@email.com").is_ok());
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if trimmed.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@domain.tld",
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(Email::new("e_silva@email.com").is_ok());
        assert!(Email::new("changed_j_snow@email.com").is_ok());
        assert!(Email::new("a.b+c@sub.example.org").is_ok());
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(Email::new("  m_pizza@email.com ").unwrap().as_str(), "m_pizza@email.com");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["plain", "two@@signs.com", "no-domain@", "@no-local.com", "a@b", "sp ace@x.com"] {
            let err = Email::new(bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Email::new("   ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }
}
