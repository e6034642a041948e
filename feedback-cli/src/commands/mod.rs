pub mod migrate;
pub mod serve;

pub use migrate::{run_migrate, MigrateArgs};
pub use serve::{run_serve, ServeArgs};

use anyhow::{Context, Result};

/// Shared database connection flags
#[derive(clap::Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "FEEDBACK_MAX_CONNECTIONS", default_value_t = feedback_server::db::DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    pub fn url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.feedback/.env")
    }

    pub async fn connect(&self) -> Result<feedback_server::db::PgPool> {
        let url = self.url()?;
        feedback_server::db::create_pool_with_options(url, self.max_connections)
            .await
            .context("Failed to create database pool")
    }
}
