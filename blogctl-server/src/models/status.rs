//! Comment moderation status
//!
//! Persisted as an integer code, rendered by symbolic name.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Every defined status with its code, in code order.
const STATUSES: [(CommentStatus, i64, &str); 5] = [
    (CommentStatus::Pending, 0, "PENDING"),
    (CommentStatus::Approved, 1, "APPROVED"),
    (CommentStatus::Rejected, 2, "REJECTED"),
    (CommentStatus::Spam, 3, "SPAM"),
    (CommentStatus::Archived, 4, "ARCHIVED"),
];

/// Lifecycle state of a post comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Spam,
    Archived,
}

/// A status code outside the defined set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid comment status code: {0}")]
pub struct InvalidStatusCode(pub i64);

impl CommentStatus {
    /// All statuses in code order.
    pub fn all() -> impl Iterator<Item = Self> {
        STATUSES.iter().map(|(status, _, _)| *status)
    }

    /// Decode an integer code.
    ///
    /// # Example
    /// ```
    /// use blogctl_server::models::CommentStatus;
    ///
    /// assert_eq!(CommentStatus::from_code(1).unwrap(), CommentStatus::Approved);
    /// assert!(CommentStatus::from_code(99).is_err());
    /// ```
    pub fn from_code(code: i64) -> Result<Self, InvalidStatusCode> {
        STATUSES
            .iter()
            .find(|(_, candidate, _)| *candidate == code)
            .map(|(status, _, _)| *status)
            .ok_or(InvalidStatusCode(code))
    }

    /// Decode a symbolic name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        STATUSES
            .iter()
            .find(|(_, _, candidate)| candidate.eq_ignore_ascii_case(name))
            .map(|(status, _, _)| *status)
    }

    pub fn code(self) -> i64 {
        self.entry().1
    }

    pub fn as_str(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (CommentStatus, i64, &'static str) {
        // Every variant has exactly one row in STATUSES.
        match self {
            Self::Pending => &STATUSES[0],
            Self::Approved => &STATUSES[1],
            Self::Rejected => &STATUSES[2],
            Self::Spam => &STATUSES[3],
            Self::Archived => &STATUSES[4],
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommentStatus {
    type Err = InvalidStatusCode;

    /// Accepts a symbolic name or a numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(status) = Self::from_name(s) {
            return Ok(status);
        }
        // Non-numeric garbage reports as code -1 so the caller still sees a
        // decode failure rather than a default.
        let code = s.trim().parse::<i64>().unwrap_or(-1);
        Self::from_code(code)
    }
}

impl Serialize for CommentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Code(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for CommentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawStatus::deserialize(deserializer)? {
            RawStatus::Code(code) => Self::from_code(code).map_err(serde::de::Error::custom),
            RawStatus::Name(name) => Self::from_name(&name).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown comment status '{}'", name))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_table() {
        for status in CommentStatus::all() {
            assert_eq!(CommentStatus::from_code(status.code()).unwrap(), status);
        }
        assert_eq!(CommentStatus::all().count(), 5);
    }

    #[test]
    fn out_of_range_code_fails() {
        assert_eq!(CommentStatus::from_code(99), Err(InvalidStatusCode(99)));
        assert_eq!(CommentStatus::from_code(-1), Err(InvalidStatusCode(-1)));
        assert_eq!(CommentStatus::from_code(5), Err(InvalidStatusCode(5)));
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(CommentStatus::from_name("spam"), Some(CommentStatus::Spam));
        assert_eq!(CommentStatus::from_name("Approved"), Some(CommentStatus::Approved));
        assert_eq!(CommentStatus::from_name("lost"), None);
    }

    #[test]
    fn from_str_accepts_name_or_code() {
        assert_eq!("REJECTED".parse::<CommentStatus>().unwrap(), CommentStatus::Rejected);
        assert_eq!("4".parse::<CommentStatus>().unwrap(), CommentStatus::Archived);
        assert!("99".parse::<CommentStatus>().is_err());
        assert!("nope".parse::<CommentStatus>().is_err());
    }

    #[test]
    fn json_uses_symbolic_name() {
        let json = serde_json::to_string(&CommentStatus::Approved).unwrap();
        assert_eq!(json, r#""APPROVED""#);
    }

    #[test]
    fn json_accepts_code_and_name() {
        let by_code: CommentStatus = serde_json::from_str("3").unwrap();
        assert_eq!(by_code, CommentStatus::Spam);

        let by_name: CommentStatus = serde_json::from_str(r#""pending""#).unwrap();
        assert_eq!(by_name, CommentStatus::Pending);

        assert!(serde_json::from_str::<CommentStatus>("99").is_err());
    }
}
