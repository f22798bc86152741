//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": kind, "message": text}` JSON bodies
//! with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Payload points at a resource that does not exist (400)
    InvalidReference { resource: &'static str },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint or still-referenced row (409)
    Conflict { message: String },

    /// Missing credentials (401)
    Unauthorized,

    /// Credentials not accepted (403)
    Forbidden { reason: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            Self::InvalidReference { resource } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                format!("{} references a resource that does not exist", resource),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} '{}' not found", resource, id),
            ),
            Self::Conflict { message } => (StatusCode::CONFLICT, "conflict", message.clone()),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing bearer token".to_owned(),
            ),
            Self::Forbidden { reason } => (StatusCode::FORBIDDEN, "forbidden", reason.clone()),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::InvalidReference { resource } => Self::InvalidReference { resource },
            DbError::Validation(e) => Self::Validation(e),
            DbError::Duplicate { .. } | DbError::InUse { .. } => Self::Conflict {
                message: e.to_string(),
            },
            DbError::Sqlx(_) | DbError::InvalidStatus(_) => Self::Database(e),
        }
    }
}
