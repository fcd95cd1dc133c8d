//! Liveness and backend status handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use vitals_core::ai::AIBackend;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET / - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "backend running",
    })
}

/// Text-generation backend status
#[derive(Debug, Serialize)]
pub struct AIStatus {
    pub backend: &'static str,
    pub host: String,
    pub model: String,
    pub available: bool,
}

/// GET /api/ai/status - Live health check of the configured backend
pub async fn get_ai_status(State(state): State<Arc<AppState>>) -> Json<AIStatus> {
    let client = state.pipeline.backend();

    Json(AIStatus {
        backend: client.kind(),
        host: client.host().to_string(),
        model: client.model().to_string(),
        available: client.health_check().await,
    })
}
