//! Test utilities for vitals-core
//!
//! A mock text-generation server speaking both the Ollama and the
//! OpenAI-compatible wire formats, for backend and pipeline tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

/// Reply text served by the mock (surrounding whitespace included on purpose)
pub const MOCK_SERVER_REPLY: &str =
    "\n  Expenses take up most of this month's income. Rent is the largest category.  \n";

#[derive(Clone, Default)]
struct MockState {
    failing: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

/// Mock text-generation server for testing
pub struct MockAIServer {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAIServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(false).await
    }

    /// Start a server that answers every request with 500
    pub async fn start_failing() -> Self {
        Self::start_with(true).await
    }

    async fn start_with(failing: bool) -> Self {
        let state = MockState {
            failing,
            prompts: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/api/tags", get(handle_health))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_health))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/health", get(handle_health))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.state.prompts.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAIServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "model crashed"})),
    )
        .into_response()
}

async fn handle_health(State(state): State<MockState>) -> Response {
    if state.failing {
        return failure();
    }
    Json(json!({"models": [{"name": "llama3.2:latest"}], "data": []})).into_response()
}

/// Ollama generate endpoint
async fn handle_generate(
    State(state): State<MockState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    state.prompts.lock().unwrap().push(request.prompt);
    if state.failing {
        return failure();
    }
    Json(json!({
        "model": request.model,
        "response": MOCK_SERVER_REPLY,
        "done": true,
    }))
    .into_response()
}

/// OpenAI-compatible chat completions endpoint
async fn handle_chat(State(state): State<MockState>, Json(request): Json<ChatRequest>) -> Response {
    if let Some(message) = request.messages.into_iter().last() {
        state.prompts.lock().unwrap().push(message.content);
    }
    if state.failing {
        return failure();
    }
    Json(json!({
        "model": request.model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": MOCK_SERVER_REPLY},
            "finish_reason": "stop",
        }],
    }))
    .into_response()
}
