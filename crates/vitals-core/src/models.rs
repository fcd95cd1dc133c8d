//! Data models for Vitals
//!
//! Inbound snapshots, the derived feature/comparison records, and the
//! outbound assessment. Every value is built fresh per request and never
//! mutated once a stage has returned it.
//!
//! Only the inbound types deserialize. Outbound types are write-only: an
//! anomaly tag upper-cases its category and cannot be read back.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Inbound
// ============================================================================

/// A single expense amount booked against a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub category: String,
    pub amount: f64,
}

impl ExpenseLine {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Income and expenses for one reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    /// Free-form period label (e.g. "2024-03")
    pub month: String,
    pub income: f64,
    #[serde(default)]
    pub expenses: Vec<ExpenseLine>,
}

impl MonthlySnapshot {
    pub fn new(month: impl Into<String>, income: f64, expenses: Vec<ExpenseLine>) -> Self {
        Self {
            month: month.into(),
            income,
            expenses,
        }
    }
}

/// Request body: the month being assessed plus an optional prior month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialHistory {
    pub current: MonthlySnapshot,
    #[serde(default)]
    pub previous: Option<MonthlySnapshot>,
}

// ============================================================================
// Feature extraction
// ============================================================================

/// Per-category totals in first-seen order
///
/// Serializes as a JSON object whose keys keep insertion order, so the
/// dominant-category tie-break and the anomaly order are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    entries: Vec<(String, f64)>,
}

impl CategoryBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `category`, appending the category if it is new
    pub fn add(&mut self, category: &str, amount: f64) {
        match self.entries.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category.to_string(), amount)),
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category with the largest total; the first one to reach the maximum wins ties
    pub fn dominant(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (name, amount) in self.iter() {
            match best {
                Some((_, top)) if amount <= top => {}
                _ => best = Some((name, amount)),
            }
        }
        best
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, amount) in &self.entries {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

/// Risk conditions raised during feature extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    /// Expenses above 85% of income
    HighExpenseRatio,
    /// One category above 40% of expenses
    CategoryDominance,
    /// Expenses exceed income
    NegativeSavings,
}

impl RiskFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::HighExpenseRatio => "HIGH_EXPENSE_RATIO",
            RiskFlag::CategoryDominance => "CATEGORY_DOMINANCE",
            RiskFlag::NegativeSavings => "NEGATIVE_SAVINGS",
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized features for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub month: String,
    pub income: f64,
    pub total_expenses: f64,
    pub savings: f64,
    /// total_expenses / income, rounded to 2 decimals
    pub expense_ratio: f64,
    pub dominant_category: String,
    /// Dominant category's share of total_expenses, rounded to 2 decimals
    pub dominant_share: f64,
    pub category_breakdown: CategoryBreakdown,
    /// In evaluation order: ratio, dominance, savings
    pub risk_flags: Vec<RiskFlag>,
}

impl FeatureRecord {
    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.risk_flags.contains(&flag)
    }
}

// ============================================================================
// Trend comparison
// ============================================================================

/// Direction of the expense ratio between two months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Worsening,
    Improving,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Worsening => "worsening",
            Trend::Improving => "improving",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    Spike,
    Drop,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::Spike => "SPIKE",
            AnomalyKind::Drop => "DROP",
        }
    }
}

/// Month-over-month category anomaly, rendered as a tag like `SPIKE_FOOD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub category: String,
}

impl Anomaly {
    pub fn spike(category: &str) -> Self {
        Self {
            kind: AnomalyKind::Spike,
            category: category.to_string(),
        }
    }

    pub fn drop(category: &str) -> Self {
        Self {
            kind: AnomalyKind::Drop,
            category: category.to_string(),
        }
    }

    pub fn tag(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.category.to_uppercase())
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl From<Anomaly> for String {
    fn from(anomaly: Anomaly) -> Self {
        anomaly.tag()
    }
}

/// Deltas between the current and previous month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    /// Unrounded difference in total expenses
    pub expense_change: f64,
    /// Difference in expense ratio, rounded to 2 decimals
    pub ratio_change: f64,
    pub trend: Trend,
    /// One entry per flagged category, in the current month's category order
    pub anomalies: Vec<Anomaly>,
}

// ============================================================================
// Decision
// ============================================================================

/// Severity tier chosen by the decision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of the decision rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub headline: &'static str,
    pub action: &'static str,
    pub note: &'static str,
    pub severity: Severity,
    /// In [0.0, 1.0], rounded to 2 decimals
    pub confidence: f64,
    /// Present only when a previous month was compared
    pub trend: Option<Trend>,
}

impl Verdict {
    /// Trend label for display; "N/A" without a comparison
    pub fn trend_label(&self) -> &'static str {
        self.trend.map(|t| t.as_str()).unwrap_or("N/A")
    }
}

// ============================================================================
// Outbound
// ============================================================================

/// Client-facing summary: the verdict plus trend label and narrative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub headline: String,
    pub action: String,
    pub note: String,
    pub severity: Severity,
    pub confidence: f64,
    pub trend: String,
    pub explanation: String,
}

impl Summary {
    pub fn new(verdict: &Verdict, explanation: String) -> Self {
        Self {
            headline: verdict.headline.to_string(),
            action: verdict.action.to_string(),
            note: verdict.note.to_string(),
            severity: verdict.severity,
            confidence: verdict.confidence,
            trend: verdict.trend_label().to_string(),
            explanation,
        }
    }
}

/// Current month's features with comparison fields merged in when available
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugView {
    #[serde(flatten)]
    pub features: FeatureRecord,
    #[serde(flatten)]
    pub comparison: Option<ComparisonRecord>,
}

impl DebugView {
    pub fn new(features: FeatureRecord, comparison: Option<ComparisonRecord>) -> Self {
        Self {
            features,
            comparison,
        }
    }

    pub fn trend(&self) -> Option<Trend> {
        self.comparison.as_ref().map(|c| c.trend)
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        self.comparison
            .as_ref()
            .map(|c| c.anomalies.as_slice())
            .unwrap_or(&[])
    }
}

/// Response body: summary for the consumer, debug view for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub summary: Summary,
    pub debug: DebugView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_accumulates_in_first_seen_order() {
        let mut breakdown = CategoryBreakdown::new();
        breakdown.add("food", 10.0);
        breakdown.add("rent", 20.0);
        breakdown.add("food", 5.0);

        let entries: Vec<_> = breakdown.iter().collect();
        assert_eq!(entries, vec![("food", 15.0), ("rent", 20.0)]);
        assert_eq!(breakdown.get("food"), Some(15.0));
        assert_eq!(breakdown.get("fun"), None);
    }

    #[test]
    fn test_dominant_tie_goes_to_first_category() {
        let mut breakdown = CategoryBreakdown::new();
        breakdown.add("food", 100.0);
        breakdown.add("rent", 100.0);
        assert_eq!(breakdown.dominant(), Some(("food", 100.0)));

        breakdown.add("fun", 100.5);
        assert_eq!(breakdown.dominant(), Some(("fun", 100.5)));
        assert_eq!(CategoryBreakdown::new().dominant(), None);
    }

    #[test]
    fn test_breakdown_serializes_in_insertion_order() {
        let mut breakdown = CategoryBreakdown::new();
        breakdown.add("zeta", 1.0);
        breakdown.add("alpha", 2.0);

        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"{"zeta":1.0,"alpha":2.0}"#);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(RiskFlag::HighExpenseRatio).unwrap(),
            "HIGH_EXPENSE_RATIO"
        );
        assert_eq!(serde_json::to_value(Trend::Worsening).unwrap(), "worsening");
        assert_eq!(serde_json::to_value(Severity::Medium).unwrap(), "medium");
    }

    #[test]
    fn test_anomaly_tag_uppercases_category() {
        assert_eq!(Anomaly::spike("Dining out").tag(), "SPIKE_DINING OUT");
        assert_eq!(Anomaly::drop("rent").to_string(), "DROP_RENT");
        assert_eq!(
            serde_json::to_value(Anomaly::spike("food")).unwrap(),
            "SPIKE_FOOD"
        );
    }

    #[test]
    fn test_history_previous_is_optional() {
        let json = r#"{"current": {"month": "2024-02", "income": 100, "expenses": []}}"#;
        let history: FinancialHistory = serde_json::from_str(json).unwrap();
        assert!(history.previous.is_none());
        assert_eq!(history.current.income, 100.0);
    }

    #[test]
    fn test_verdict_trend_label() {
        let mut verdict = Verdict {
            headline: "h",
            action: "a",
            note: "n",
            severity: Severity::Low,
            confidence: 0.5,
            trend: None,
        };
        assert_eq!(verdict.trend_label(), "N/A");
        verdict.trend = Some(Trend::Stable);
        assert_eq!(verdict.trend_label(), "stable");
        assert_eq!(Summary::new(&verdict, "x".into()).trend, "stable");
    }
}
