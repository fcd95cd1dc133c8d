//! Assessment pipeline
//!
//! Sequences the analysis stages for one request:
//!
//! 1. validate both snapshots (nothing runs on bad input)
//! 2. extract current features, and previous features when given
//! 3. compare the two months
//! 4. interpret features + comparison into a verdict
//! 5. ask the text-generation backend for a short narrative
//!
//! Steps 1-4 are pure. Step 5 is a single outbound call with no retry and
//! no fallback text: a backend failure fails the whole assessment.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::ai::{AIBackend, AIClient};
use crate::analysis::{self, features};
use crate::error::Result;
use crate::models::{
    Assessment, ComparisonRecord, DebugView, FeatureRecord, FinancialHistory, Summary, Verdict,
};
use crate::prompts::{Prompt, PromptId, PromptLibrary};

/// Result of the pure stages, before any narrative is requested
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub features: FeatureRecord,
    pub comparison: Option<ComparisonRecord>,
    pub verdict: Verdict,
}

impl Analysis {
    /// Current features with comparison fields merged in
    pub fn debug_view(&self) -> DebugView {
        DebugView::new(self.features.clone(), self.comparison.clone())
    }
}

/// Run validation, extraction, comparison and decision for a history
pub fn analyze(history: &FinancialHistory) -> Result<Analysis> {
    features::validate(&history.current)?;
    if let Some(previous) = &history.previous {
        features::validate(previous)?;
    }

    let current = analysis::extract(&history.current)?;

    let comparison = match &history.previous {
        Some(previous) => {
            let previous = analysis::extract(previous)?;
            Some(analysis::compare(&current, &previous))
        }
        None => None,
    };

    let verdict = analysis::interpret(&current, comparison.as_ref());

    Ok(Analysis {
        features: current,
        comparison,
        verdict,
    })
}

/// Pipeline bound to one text-generation backend
///
/// Build once at start-up and share; every call works on request-local
/// values only.
#[derive(Clone)]
pub struct AssessmentPipeline<B = AIClient> {
    backend: B,
    prompt: Prompt,
}

impl<B: AIBackend> AssessmentPipeline<B> {
    /// Create a pipeline using the default prompt library
    pub fn new(backend: B) -> Result<Self> {
        Self::with_prompts(backend, &PromptLibrary::new())
    }

    /// Create a pipeline with an explicit prompt library
    pub fn with_prompts(backend: B, prompts: &PromptLibrary) -> Result<Self> {
        let prompt = prompts.get(PromptId::ExplainAssessment)?;
        if prompt.is_override {
            info!(
                path = ?prompt.override_path,
                version = prompt.metadata.version,
                "Using explanation prompt override"
            );
        }
        Ok(Self { backend, prompt })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the pure stages only
    pub fn analyze(&self, history: &FinancialHistory) -> Result<Analysis> {
        analyze(history)
    }

    /// Render the explanation prompt for a debug view
    pub fn render_prompt(&self, view: &DebugView) -> String {
        let features = &view.features;

        let mut vars = HashMap::new();
        vars.insert("expense_ratio", format_number(features.expense_ratio));
        vars.insert("savings", format_number(features.savings));
        vars.insert("dominant_category", features.dominant_category.clone());
        vars.insert("risk_flags", format_list(features.risk_flags.iter()));
        vars.insert(
            "trend",
            view.trend()
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        );
        vars.insert("anomalies", format_list(view.anomalies().iter()));

        self.prompt.render(&vars)
    }

    /// Run the full assessment, including the narrative explanation
    pub async fn run(&self, history: &FinancialHistory) -> Result<Assessment> {
        let analysis = self.analyze(history)?;
        let debug = analysis.debug_view();

        let prompt = self.render_prompt(&debug);
        debug!(model = %self.backend.model(), "Requesting explanation:\n{}", prompt);

        let explanation = self.backend.generate(&prompt).await?.trim().to_string();

        info!(
            month = %analysis.features.month,
            severity = %analysis.verdict.severity,
            confidence = analysis.verdict.confidence,
            trend = analysis.verdict.trend_label(),
            "Assessment complete"
        );

        Ok(Assessment {
            summary: Summary::new(&analysis.verdict, explanation),
            debug,
        })
    }
}

/// Format a number with at least one decimal place (1500 -> "1500.0")
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn format_list<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    let items: Vec<String> = items.map(|item| item.to_string()).collect();
    format!("[{}]", items.join(", "))
}
