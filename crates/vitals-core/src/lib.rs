//! Vitals Core Library
//!
//! Deterministic financial-health assessment from one or two months of
//! income/expense data:
//! - Feature extraction, trend/anomaly comparison and rule-based decision
//! - Pipeline orchestrator that sequences the stages per request
//! - Pluggable text-generation backends (Ollama, OpenAI-compatible, mock)
//! - Prompt library for the explanation prompt

pub mod ai;
pub mod analysis;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prompts;

/// Test utilities including a mock text-generation server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use analysis::{compare, extract, interpret};
pub use error::{Error, Result};
pub use models::{
    Anomaly, AnomalyKind, Assessment, CategoryBreakdown, ComparisonRecord, DebugView, ExpenseLine,
    FeatureRecord, FinancialHistory, MonthlySnapshot, RiskFlag, Severity, Summary, Trend, Verdict,
};
pub use pipeline::{analyze, Analysis, AssessmentPipeline};
pub use prompts::{Prompt, PromptId, PromptLibrary};
