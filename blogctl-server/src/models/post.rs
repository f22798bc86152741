//! Post write payloads and list filters

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::validation::required_text;
use super::{ResourceRef, SortableColumns, ValidationError};

/// Maximum length for post titles
const MAX_TITLE_LEN: usize = 256;

/// Maximum length for post content (64KB)
const MAX_CONTENT_LEN: usize = 65536;

/// Properties posts can be sorted by
pub const POST_SORTABLE: SortableColumns = &[
    ("id", "id"),
    ("title", "title"),
    ("createdAt", "created_at"),
];

/// Post body accepted by POST and PUT
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    pub user: ResourceRef,
}

/// Validated post fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

impl PostDraft {
    /// Validate post fields.
    ///
    /// # Rules
    /// - Title non-empty after trimming, max 256 characters
    /// - Content max 64KB, empty allowed
    pub fn new(
        title: &str,
        content: &str,
        created_at: DateTime<Utc>,
        user_id: i64,
    ) -> Result<Self, ValidationError> {
        if content.len() > MAX_CONTENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_CONTENT_LEN,
            });
        }

        Ok(Self {
            title: required_text("title", title, MAX_TITLE_LEN)?,
            content: content.to_owned(),
            created_at,
            user_id,
        })
    }
}

impl TryFrom<PostPayload> for PostDraft {
    type Error = ValidationError;

    fn try_from(payload: PostPayload) -> Result<Self, Self::Error> {
        let user_id = payload.user.resolve("user", "users")?;
        Self::new(
            &payload.title,
            &payload.content,
            payload.created_at.unwrap_or_else(Utc::now),
            user_id,
        )
    }
}

/// Dynamic filter for post listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilter {
    pub user_id: Option<i64>,
    /// Substring match on the title
    pub title: Option<String>,
}
