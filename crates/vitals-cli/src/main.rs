//! Vitals CLI - Financial health assessment
//!
//! Usage:
//!   vitals assess --file history.json    Assess a month (optionally vs. the previous one)
//!   vitals prompt --file history.json    Show the explanation prompt without calling the backend
//!   vitals ai-status                     Check the configured text-generation backend
//!   vitals serve --port 8000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    match cli.command {
        Commands::Assess { file, json } => commands::cmd_assess(&file, json).await,
        Commands::Prompt { file } => commands::cmd_prompt(&file),
        Commands::AiStatus => commands::cmd_ai_status().await,
        Commands::Serve {
            port,
            host,
            allow_origin,
        } => commands::cmd_serve(&host, port, allow_origin).await,
    }
}
