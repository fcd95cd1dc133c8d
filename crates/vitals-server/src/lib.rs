//! Vitals Web Server
//!
//! Axum-based REST API over the assessment pipeline.
//!
//! - `POST /reason`: run an assessment for a `FinancialHistory`
//! - `GET /`: liveness
//! - `GET /api/ai/status`: text-generation backend status
//!
//! Error responses are sanitized: client mistakes get their message back,
//! backend and internal failures get a generic one and are logged in full.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use vitals_core::ai::{AIBackend, AIClient};
use vitals_core::pipeline::AssessmentPipeline;

mod handlers;

/// Origins allowed by default (local frontend dev server)
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ServerConfig {
    /// Read `VITALS_ALLOWED_ORIGINS` (comma-separated), falling back to the defaults
    pub fn from_env() -> Self {
        match std::env::var("VITALS_ALLOWED_ORIGINS") {
            Ok(value) => Self {
                allowed_origins: parse_origins(&value),
            },
            Err(_) => Self::default(),
        }
    }
}

/// Parse a comma-separated list of origins, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shared application state
pub struct AppState {
    pub pipeline: AssessmentPipeline<AIClient>,
}

/// Create the application router
pub fn create_router(pipeline: AssessmentPipeline<AIClient>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { pipeline });

    let api_routes = Router::new().route("/ai/status", get(handlers::get_ai_status));

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(handlers::health))
        .route("/reason", post(handlers::reason))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(
    pipeline: AssessmentPipeline<AIClient>,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_ai_connection(pipeline.backend()).await;

    let app = create_router(pipeline, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(client: &AIClient) {
    if client.health_check().await {
        info!(
            "✅ AI backend connected: {} ({}, model: {})",
            client.host(),
            client.kind(),
            client.model()
        );
    } else {
        warn!(
            "⚠️  AI backend configured but not responding: {} (model: {})",
            client.host(),
            client.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_gateway(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Keep the underlying error for logging
    fn with_internal(mut self, err: anyhow::Error) -> Self {
        self.internal = Some(err);
        self
    }
}

impl From<vitals_core::Error> for AppError {
    fn from(err: vitals_core::Error) -> Self {
        if err.is_client_error() {
            AppError::bad_request(&err.to_string())
        } else if err.is_backend_error() {
            AppError::bad_gateway("Explanation service unavailable").with_internal(err.into())
        } else {
            AppError::internal("An internal error occurred").with_internal(err.into())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}
