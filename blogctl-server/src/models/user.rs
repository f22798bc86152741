//! User write payloads and list filters

use serde::Deserialize;

use super::validation::required_text;
use super::{Email, SortableColumns, ValidationError};

/// Maximum length for first/last names
const MAX_NAME_LEN: usize = 100;

/// Properties users can be sorted by
pub const USER_SORTABLE: SortableColumns = &[
    ("id", "id"),
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("email", "email"),
    ("age", "age"),
];

/// User body accepted by POST and PUT
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
}

/// Validated user fields, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub age: i32,
}

impl UserDraft {
    /// Validate all replaceable user fields.
    ///
    /// # Rules
    /// - Names non-empty after trimming, max 100 characters
    /// - Email well-formed
    /// - Age not negative
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        age: i32,
    ) -> Result<Self, ValidationError> {
        if age < 0 {
            return Err(ValidationError::OutOfRange { field: "age", min: 0 });
        }

        Ok(Self {
            first_name: required_text("firstName", first_name, MAX_NAME_LEN)?,
            last_name: required_text("lastName", last_name, MAX_NAME_LEN)?,
            email: Email::new(email)?,
            age,
        })
    }
}

impl TryFrom<UserPayload> for UserDraft {
    type Error = ValidationError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        Self::new(
            &payload.first_name,
            &payload.last_name,
            &payload.email,
            payload.age,
        )
    }
}

/// Dynamic filter for user listings; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub email: Option<String>,
    pub last_name: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}
