//! Server command implementation

use anyhow::Result;
use vitals_core::ai::AIBackend;
use vitals_core::pipeline::AssessmentPipeline;
use vitals_server::ServerConfig;

use super::ai_client;

pub async fn cmd_serve(host: &str, port: u16, allow_origin: Vec<String>) -> Result<()> {
    let client = ai_client()?;

    println!("🚀 Starting Vitals web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   AI backend: {} ({}, model: {})",
        client.kind(),
        client.host(),
        client.model()
    );

    let config = server_config(allow_origin);
    if config.allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", config.allowed_origins.join(", "));
    }
    println!();

    let pipeline = AssessmentPipeline::new(client)?;
    vitals_server::serve(pipeline, host, port, config).await
}

/// `--allow-origin` flags win over `VITALS_ALLOWED_ORIGINS`
pub fn server_config(allow_origin: Vec<String>) -> ServerConfig {
    if allow_origin.is_empty() {
        ServerConfig::from_env()
    } else {
        ServerConfig {
            allowed_origins: allow_origin,
        }
    }
}
