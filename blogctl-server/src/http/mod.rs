//! HTTP server layer
//!
//! Axum server with:
//! - Hypermedia JSON for users, posts and post comments under `/api/v1`
//! - CORS (localhost only by default)
//! - Request tracing
//! - Optional bearer-token principal for reads
//! - Graceful shutdown
//! - JSON error responses

pub mod auth;
pub mod error;
pub mod extractors;
pub mod hal;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerError};
