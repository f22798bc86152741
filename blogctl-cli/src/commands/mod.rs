//! Command implementations for the blogctl CLI

pub mod db;
pub mod serve;

pub use db::{run_migrate, run_seed, DbArgs};
pub use serve::{run_serve, ServeArgs};
