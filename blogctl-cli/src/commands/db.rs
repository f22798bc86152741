//! Schema and demo-data commands

use anyhow::{Context, Result};
use clap::Args;

use blogctl_server::db::{create_pool, migrations, seed};
use blogctl_server::BlogConfig;

/// Database selection shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct DbArgs {
    /// Database URL (overrides config/environment), e.g. sqlite://blog.db
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl DbArgs {
    pub fn apply(&self, config: &mut BlogConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
    }
}

/// Create the schema
pub async fn run_migrate(args: DbArgs, mut config: BlogConfig) -> Result<()> {
    args.apply(&mut config);

    let pool = create_pool(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("Schema ready at {}", config.database_url);
    Ok(())
}

/// Create the schema and load demo data unless users already exist
pub async fn run_seed(args: DbArgs, mut config: BlogConfig) -> Result<()> {
    args.apply(&mut config);

    let pool = create_pool(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    match seed::seed_demo_data(&pool)
        .await
        .context("Failed to seed demo data")?
    {
        Some(summary) => println!(
            "Seeded {} users, {} posts, {} comments",
            summary.users, summary.posts, summary.comments
        ),
        None => println!("Users already present, nothing seeded"),
    }
    Ok(())
}
