//! Assessment handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{AppError, AppState};
use vitals_core::models::{Assessment, FinancialHistory};

/// POST /reason - Assess one month, optionally against the previous one
pub async fn reason(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FinancialHistory>, JsonRejection>,
) -> Result<Json<Assessment>, AppError> {
    let Json(history) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let assessment = state.pipeline.run(&history).await?;

    Ok(Json(assessment))
}
