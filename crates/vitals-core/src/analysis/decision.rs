//! Rule-based severity and confidence decision
//!
//! Severity tiers are checked top to bottom and the first match wins:
//!
//! | Condition                    | Severity | Base confidence |
//! |------------------------------|----------|-----------------|
//! | `NEGATIVE_SAVINGS` raised    | high     | 0.90            |
//! | `HIGH_EXPENSE_RATIO` raised  | medium   | 0.75            |
//! | otherwise                    | low      | 0.50            |
//!
//! `CATEGORY_DOMINANCE` is reported in the features but does not move the
//! severity. A worsening trend adds 0.1 (capped at 1.0), an improving trend
//! subtracts 0.1 (floored at 0.4).

use tracing::debug;

use crate::models::{ComparisonRecord, FeatureRecord, RiskFlag, Severity, Trend, Verdict};

use super::round2;

const TREND_CONFIDENCE_STEP: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 1.0;
const IMPROVING_CONFIDENCE_FLOOR: f64 = 0.4;

/// Fixed user-facing text for a severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityText {
    pub headline: &'static str,
    pub action: &'static str,
    pub note: &'static str,
}

impl Severity {
    /// Starting confidence before any trend adjustment
    pub fn base_confidence(&self) -> f64 {
        match self {
            Severity::High => 0.9,
            Severity::Medium => 0.75,
            Severity::Low => 0.5,
        }
    }

    pub fn text(&self) -> SeverityText {
        match self {
            Severity::High => SeverityText {
                headline: "Expenses exceed sustainable limits.",
                action: "Reduce spending immediately.",
                note: "Negative savings increase financial risk.",
            },
            Severity::Medium => SeverityText {
                headline: "Spending trend needs attention.",
                action: "Review discretionary expenses.",
                note: "Expenses are increasing faster than income.",
            },
            Severity::Low => SeverityText {
                headline: "Spending looks balanced.",
                action: "Maintain current budget.",
                note: "No immediate financial risk detected.",
            },
        }
    }
}

/// Pick the severity tier for a feature record
pub fn severity_for(features: &FeatureRecord) -> Severity {
    if features.has_flag(RiskFlag::NegativeSavings) {
        Severity::High
    } else if features.has_flag(RiskFlag::HighExpenseRatio) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Nudge confidence by the month-over-month trend
pub fn adjust_confidence(confidence: f64, trend: Trend) -> f64 {
    match trend {
        Trend::Worsening => (confidence + TREND_CONFIDENCE_STEP).min(MAX_CONFIDENCE),
        Trend::Improving => (confidence - TREND_CONFIDENCE_STEP).max(IMPROVING_CONFIDENCE_FLOOR),
        Trend::Stable => confidence,
    }
}

/// Map features and an optional comparison to a verdict
pub fn interpret(features: &FeatureRecord, comparison: Option<&ComparisonRecord>) -> Verdict {
    let severity = severity_for(features);

    let mut confidence = severity.base_confidence();
    if let Some(comparison) = comparison {
        confidence = adjust_confidence(confidence, comparison.trend);
    }
    let confidence = round2(confidence.clamp(0.0, MAX_CONFIDENCE));

    let text = severity.text();

    debug!(
        month = %features.month,
        severity = %severity,
        confidence,
        "Interpreted features"
    );

    Verdict {
        headline: text.headline,
        action: text.action,
        note: text.note,
        severity,
        confidence,
        trend: comparison.map(|c| c.trend),
    }
}
