//! HTTP server command
//!
//! Migrates the schema, optionally seeds demo data, then serves until
//! Ctrl+C/SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;

use blogctl_server::db::pool::create_pool_with_options;
use blogctl_server::db::{migrations, seed};
use blogctl_server::{run_server, AuthMode, BlogConfig};

use super::DbArgs;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[arg(long, short = 'b', env = "BLOGCTL_BIND")]
    pub bind: Option<SocketAddr>,

    #[command(flatten)]
    pub db: DbArgs,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Require a bearer token on GET requests
    #[arg(long)]
    pub require_principal: bool,

    /// Accepted bearer token (repeatable); none accepts any token
    #[arg(long = "token", value_name = "TOKEN")]
    pub tokens: Vec<String>,

    /// Load demo data before serving when the database has no users
    #[arg(long)]
    pub seed: bool,
}

impl ServeArgs {
    fn apply(&self, config: &mut BlogConfig) {
        self.db.apply(config);
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if self.cors_permissive {
            config.cors_permissive = true;
        }
        if self.require_principal {
            config.auth.mode = AuthMode::PrincipalForReads;
        }
        if !self.tokens.is_empty() {
            config.auth.tokens = self.tokens.clone();
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: BlogConfig) -> Result<()> {
    args.apply(&mut config);

    tracing::info!("Starting blogctl server on {}", config.bind_addr);

    let pool = create_pool_with_options(&config.database_url, config.max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    if args.seed {
        seed::seed_demo_data(&pool)
            .await
            .context("Failed to seed demo data")?;
    }

    // Run server (blocks until shutdown)
    run_server(pool, &config).await.context("Server error")?;

    Ok(())
}
