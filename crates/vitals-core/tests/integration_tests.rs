//! Integration tests for vitals-core
//!
//! These tests exercise the full snapshot → features → comparison → verdict
//! workflow through the public API, using the mock text-generation backend.

use vitals_core::{
    analyze, ai::AIBackend, AssessmentPipeline, Error, FinancialHistory, MockBackend,
    PromptLibrary, RiskFlag, Severity, Trend,
};

/// Request body in the wire format the HTTP layer receives
fn history_json(current: &str, previous: Option<&str>) -> FinancialHistory {
    let body = match previous {
        Some(previous) => format!(r#"{{"current": {}, "previous": {}}}"#, current, previous),
        None => format!(r#"{{"current": {}}}"#, current),
    };
    serde_json::from_str(&body).expect("valid history JSON")
}

fn pipeline(mock: &MockBackend) -> AssessmentPipeline<MockBackend> {
    AssessmentPipeline::with_prompts(mock.clone(), &PromptLibrary::embedded_only())
        .expect("embedded prompt loads")
}

// =============================================================================
// Single-month assessments
// =============================================================================

#[tokio::test]
async fn test_balanced_month_is_low_severity() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 5000, "expenses": [
            {"category": "food", "amount": 1000},
            {"category": "rent", "amount": 2000},
            {"category": "fun", "amount": 500}
        ]}"#,
        None,
    );

    let mock = MockBackend::new();
    let assessment = pipeline(&mock).run(&history).await.unwrap();
    let debug = &assessment.debug.features;

    assert_eq!(debug.total_expenses, 3500.0);
    assert_eq!(debug.savings, 1500.0);
    assert_eq!(debug.expense_ratio, 0.7);
    assert_eq!(debug.dominant_category, "rent");
    assert_eq!(debug.dominant_share, 0.57);
    assert_eq!(debug.risk_flags, vec![RiskFlag::CategoryDominance]);

    assert_eq!(assessment.summary.severity, Severity::Low);
    assert_eq!(assessment.summary.confidence, 0.5);
    assert_eq!(assessment.summary.trend, "N/A");
    assert_eq!(assessment.summary.headline, "Spending looks balanced.");
}

#[tokio::test]
async fn test_high_expense_ratio_is_medium_severity() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 3000, "expenses": [{"category": "rent", "amount": 2800}]}"#,
        None,
    );

    let assessment = pipeline(&MockBackend::new()).run(&history).await.unwrap();

    assert_eq!(assessment.debug.features.expense_ratio, 0.93);
    assert_eq!(assessment.debug.features.dominant_share, 1.0);
    assert_eq!(
        assessment.debug.features.risk_flags,
        vec![RiskFlag::HighExpenseRatio, RiskFlag::CategoryDominance]
    );
    assert_eq!(assessment.summary.severity, Severity::Medium);
    assert_eq!(assessment.summary.confidence, 0.75);
}

#[tokio::test]
async fn test_negative_savings_is_high_severity() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 2000, "expenses": [{"category": "rent", "amount": 2500}]}"#,
        None,
    );

    let assessment = pipeline(&MockBackend::new()).run(&history).await.unwrap();

    assert_eq!(assessment.debug.features.savings, -500.0);
    assert!(assessment.debug.features.has_flag(RiskFlag::NegativeSavings));
    assert_eq!(assessment.summary.severity, Severity::High);
    assert_eq!(assessment.summary.confidence, 0.9);
    assert_eq!(assessment.summary.action, "Reduce spending immediately.");
}

// =============================================================================
// Two-month assessments
// =============================================================================

#[tokio::test]
async fn test_worsening_trend_boosts_confidence() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 1000, "expenses": [
            {"category": "rent", "amount": 400},
            {"category": "food", "amount": 200}
        ]}"#,
        Some(
            r#"{"month": "2024-02", "income": 1000, "expenses": [
                {"category": "rent", "amount": 400},
                {"category": "food", "amount": 100}
            ]}"#,
        ),
    );

    let assessment = pipeline(&MockBackend::new()).run(&history).await.unwrap();
    let comparison = assessment.debug.comparison.as_ref().unwrap();

    assert_eq!(comparison.ratio_change, 0.1);
    assert_eq!(comparison.trend, Trend::Worsening);
    assert_eq!(comparison.expense_change, 100.0);
    let tags: Vec<String> = comparison.anomalies.iter().map(|a| a.tag()).collect();
    assert_eq!(tags, vec!["SPIKE_FOOD"]);

    assert_eq!(assessment.summary.trend, "worsening");
    assert_eq!(assessment.summary.confidence, 0.6);
}

#[tokio::test]
async fn test_new_category_is_not_an_anomaly() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 1000, "expenses": [
            {"category": "rent", "amount": 400},
            {"category": "travel", "amount": 300}
        ]}"#,
        Some(r#"{"month": "2024-02", "income": 1000, "expenses": [{"category": "rent", "amount": 400}]}"#),
    );

    let analysis = analyze(&history).unwrap();
    assert!(analysis.comparison.unwrap().anomalies.is_empty());
}

#[tokio::test]
async fn test_improving_trend_floors_confidence() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 1000, "expenses": [{"category": "rent", "amount": 300}, {"category": "food", "amount": 300}]}"#,
        Some(r#"{"month": "2024-02", "income": 1000, "expenses": [{"category": "rent", "amount": 300}, {"category": "food", "amount": 500}]}"#),
    );

    let analysis = analyze(&history).unwrap();
    assert_eq!(analysis.verdict.trend, Some(Trend::Improving));
    assert_eq!(analysis.verdict.severity, Severity::Low);
    assert_eq!(analysis.verdict.confidence, 0.4);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_zero_income_is_client_error() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 0, "expenses": [{"category": "rent", "amount": 10}]}"#,
        None,
    );

    let mock = MockBackend::new();
    let err = pipeline(&mock).run(&history).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(mock.prompts().is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_not_papered_over() {
    let history = history_json(
        r#"{"month": "2024-03", "income": 1000, "expenses": [{"category": "rent", "amount": 10}]}"#,
        None,
    );

    let mock = MockBackend::failing("upstream unavailable");
    assert!(!mock.health_check().await);

    let err = pipeline(&mock).run(&history).await.unwrap_err();
    assert!(err.is_backend_error());
    assert!(err.to_string().contains("upstream unavailable"));
}

#[tokio::test]
async fn test_concurrent_runs_are_independent() {
    let mock = MockBackend::new();
    let pipeline = pipeline(&mock);

    let low = history_json(
        r#"{"month": "a", "income": 10000, "expenses": [{"category": "x", "amount": 100}, {"category": "y", "amount": 100}, {"category": "z", "amount": 100}]}"#,
        None,
    );
    let high = history_json(
        r#"{"month": "b", "income": 100, "expenses": [{"category": "x", "amount": 500}]}"#,
        None,
    );

    let (a, b) = tokio::join!(pipeline.run(&low), pipeline.run(&high));
    assert_eq!(a.unwrap().summary.severity, Severity::Low);
    assert_eq!(b.unwrap().summary.severity, Severity::High);
    assert_eq!(mock.prompts().len(), 2);
}
