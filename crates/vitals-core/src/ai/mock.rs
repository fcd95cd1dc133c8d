//! Mock backend for testing
//!
//! Returns a fixed explanation without a running LLM server. The reply can
//! be overridden, the backend can be told to fail, and every prompt it
//! receives is recorded so tests can assert on the exact text sent.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

/// Default reply returned by the mock
pub const MOCK_EXPLANATION: &str =
    "Spending stayed within a familiar range this month. Most of it went to a single category.";

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Reply returned from `generate`
    pub response: String,
    /// When set, `generate` fails with this message
    pub failure: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: MOCK_EXPLANATION.to_string(),
            failure: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a mock whose `generate` always fails
    pub fn failing(message: &str) -> Self {
        Self {
            healthy: false,
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Replace the canned reply
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts().pop()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.failure {
            Some(message) => Err(Error::Explanation(message.clone())),
            None => Ok(self.response.clone()),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
