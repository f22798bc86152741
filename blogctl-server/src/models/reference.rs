//! References to other resources inside write payloads
//!
//! A reference may be a bare id (`3`) or a resource URI
//! (`"/api/v1/users/3"`, `"http://host/api/v1/users/3"`).

use serde::Deserialize;

use super::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResourceRef {
    Id(i64),
    Uri(String),
}

impl ResourceRef {
    /// Resolve to an id, checking that a URI points into `collection`.
    pub fn resolve(
        &self,
        field: &'static str,
        collection: &str,
    ) -> Result<i64, ValidationError> {
        match self {
            Self::Id(id) => Ok(*id),
            Self::Uri(uri) => {
                let mut segments = uri.trim().trim_end_matches('/').rsplit('/');
                let id = segments.next().unwrap_or_default();

                if let Ok(id) = id.parse::<i64>() {
                    match segments.next() {
                        // bare numeric string
                        None => return Ok(id),
                        Some(segment) if segment == collection => return Ok(id),
                        Some(_) => {}
                    }
                }

                Err(ValidationError::InvalidFormat {
                    field,
                    reason: "must be an id or a link to the referenced resource",
                })
            }
        }
    }
}
