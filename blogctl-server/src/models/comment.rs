//! Post comment write payloads and list filters

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::validation::required_text;
use super::{CommentStatus, ResourceRef, SortableColumns, ValidationError};

/// Maximum length for review text
const MAX_REVIEW_LEN: usize = 4096;

/// Properties comments can be sorted by
pub const COMMENT_SORTABLE: SortableColumns = &[
    ("id", "id"),
    ("votes", "votes"),
    ("status", "status"),
    ("createdAt", "created_at"),
];

/// Comment body accepted by POST and PUT
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub review: String,
    #[serde(default)]
    pub votes: i32,
    #[serde(default)]
    pub status: CommentStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub post: ResourceRef,
    pub user: ResourceRef,
}

/// Validated comment fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub review: String,
    pub votes: i32,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
    pub post_id: i64,
    pub user_id: i64,
}

impl TryFrom<CommentPayload> for CommentDraft {
    type Error = ValidationError;

    fn try_from(payload: CommentPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            review: required_text("review", &payload.review, MAX_REVIEW_LEN)?,
            votes: payload.votes,
            status: payload.status,
            created_at: payload.created_at.unwrap_or_else(Utc::now),
            post_id: payload.post.resolve("post", "posts")?,
            user_id: payload.user.resolve("user", "users")?,
        })
    }
}

/// Dynamic filter for comment listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFilter {
    pub post_id: Option<i64>,
    pub user_id: Option<i64>,
    /// Status name or code
    pub status: Option<String>,
    pub min_votes: Option<i32>,
}

impl CommentFilter {
    /// Decode the status filter, if any.
    pub fn status(&self) -> Result<Option<CommentStatus>, ValidationError> {
        self.status
            .as_deref()
            .map(|raw| {
                raw.parse::<CommentStatus>()
                    .map_err(|_| ValidationError::InvalidVariant {
                        field: "status",
                        value: raw.to_owned(),
                    })
            })
            .transpose()
    }
}
