//! AI backend status command

use anyhow::Result;
use vitals_core::ai::{AIBackend, AIClient};

/// Report the configured AI backend and whether it responds
pub async fn cmd_ai_status() -> Result<()> {
    println!("🔍 Checking AI backend...\n");

    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());
    println!("  AI_BACKEND: {}", backend);

    let Some(client) = AIClient::from_env() else {
        println!("\n⚠️  AI backend not configured");
        println!("\nTo configure a backend:");
        println!("  Ollama:            export OLLAMA_HOST=http://localhost:11434");
        println!("  OpenAI-compatible: export AI_BACKEND=openai_compatible");
        println!("                     export OPENAI_COMPATIBLE_HOST=https://api.mistral.ai");
        println!("                     export OPENAI_COMPATIBLE_API_KEY=...");
        return Ok(());
    };

    println!("  Host:       {}", client.host());
    println!("  Model:      {}\n", client.model());

    if client.health_check().await {
        println!("✅ {} backend is responding", client.kind());
    } else {
        println!("❌ {} backend is not responding at {}", client.kind(), client.host());
    }

    Ok(())
}
