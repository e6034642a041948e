//! feedback CLI - runs the feedback board API
//!
//! - `feedback serve`: migrate, then serve HTTP until shutdown
//! - `feedback migrate`: apply the schema and exit
//!
//! Settings come from flags, then environment variables, then `./.env`,
//! then `~/.feedback/.env`.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "feedback",
    author,
    version,
    about = "Product feedback board API: suggestions, votes, comments, and replies"
)]
struct Cli {
    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),
    /// Create or update the database schema, then exit
    Migrate(commands::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap's `env` fallbacks see .env values
    let loaded = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;
    config::report_dotenv(&loaded);

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Migrate(args) => commands::run_migrate(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
