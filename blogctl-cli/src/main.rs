//! blogctl CLI - run and manage the blog backend
//!
//! - `serve`: migrate the schema and run the HTTP API
//! - `migrate`: create the schema only
//! - `seed`: load the demo users, posts and comments

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use blogctl_server::BlogConfig;

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "blogctl",
    author,
    version,
    about = "Blog backend serving users, posts and comments as hypermedia JSON"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.blogctl/config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),
    /// Create the database schema
    Migrate(commands::DbArgs),
    /// Load demo data (skipped when users already exist)
    Seed(commands::DbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap `env` fallbacks can see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    let config =
        BlogConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::Migrate(args) => commands::run_migrate(args, config).await?,
        Commands::Seed(args) => commands::run_seed(args, config).await?,
    }

    Ok(())
}
