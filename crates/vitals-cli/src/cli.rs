//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Vitals - Deterministic financial health checks
#[derive(Parser)]
#[command(name = "vitals")]
#[command(about = "Assess monthly income and spending health", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assess a month of income and expenses
    ///
    /// The file holds `{"current": {...}, "previous": {...}}`, where
    /// `previous` is optional and enables trend and anomaly detection.
    Assess {
        /// JSON file with the financial history
        #[arg(short, long)]
        file: PathBuf,

        /// Print the full assessment as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the explanation prompt without contacting the AI backend
    Prompt {
        /// JSON file with the financial history
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check the configured AI backend
    AiStatus,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable)
        ///
        /// Overrides VITALS_ALLOWED_ORIGINS. Defaults to the local frontend
        /// dev server (http://localhost:3000).
        #[arg(long)]
        allow_origin: Vec<String>,
    },
}
