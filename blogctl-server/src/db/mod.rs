//! Database layer - connection pool, schema and repositories
//!
//! - Connection pool with explicit limits, shared as `SqlitePool`
//! - Rely on DB constraints and classify their failures, no check-then-insert
//! - Count and page fetch of a listing run in one transaction

pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;

pub use pool::create_pool;
pub use repos::*;
