//! HTTP server command
//!
//! Connects to PostgreSQL, applies migrations, and serves the feedback API
//! until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use feedback_server::db::migrations;
use feedback_server::http::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "FEEDBACK_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long, env = "FEEDBACK_CORS_PERMISSIVE")]
    pub cors_permissive: bool,

    /// Browser origin allowed to call the API (repeatable; defaults to localhost:3000/3030)
    #[arg(long = "allow-origin", env = "FEEDBACK_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Skip schema migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = args.db.connect().await?;

    if args.skip_migrations {
        tracing::info!("skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    tracing::info!(bind = %args.bind, "starting feedback server");

    let mut config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        ..ServerConfig::default()
    };
    if !args.allowed_origins.is_empty() {
        config.allowed_origins = args.allowed_origins;
    }

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
