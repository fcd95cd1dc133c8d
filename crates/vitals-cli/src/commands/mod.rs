//! CLI command implementations
//!
//! - `assess` - Run an assessment, print the explanation prompt
//! - `serve` - Web server command
//! - `status` - AI backend status

pub mod assess;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use assess::*;
pub use serve::*;
pub use status::*;

use std::path::Path;

use anyhow::{Context, Result};
use vitals_core::ai::AIClient;
use vitals_core::models::FinancialHistory;

/// Read a `FinancialHistory` from a JSON file
pub fn load_history(path: &Path) -> Result<FinancialHistory> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid financial history in {}", path.display()))
}

/// Build the AI client from the environment, or explain how to configure one
pub fn ai_client() -> Result<AIClient> {
    AIClient::from_env().context(
        "No AI backend configured. Set OLLAMA_HOST, or AI_BACKEND=openai_compatible \
         with OPENAI_COMPATIBLE_HOST (AI_BACKEND=mock for offline use)",
    )
}
