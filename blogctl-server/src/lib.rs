//! blogctl-server: blog backend exposing users, posts and post comments
//!
//! Resources are served as hypermedia JSON under `/api/v1`, backed by a
//! SQLite database through `sqlx`.
//!
//! - [`models`]: validated write payloads, filters, paging, comment status
//! - [`db`]: pool, schema, repositories and demo seed data
//! - [`projection`]: reduced views selected with `?projection=`
//! - [`http`]: router, handlers, auth and error mapping
//! - [`config`]: file and environment configuration

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod projection;

pub use config::{AuthConfig, AuthMode, BlogConfig, ConfigError};
pub use http::{build_router, run_server, ApiError, AppState, ServerError};
