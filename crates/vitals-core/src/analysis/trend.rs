//! Month-over-month trend and anomaly detection

use tracing::debug;

use crate::models::{Anomaly, ComparisonRecord, FeatureRecord, Trend};

use super::{round2, DROP_THRESHOLD, SPIKE_THRESHOLD, TREND_THRESHOLD};

/// Compare the current month against the previous one
///
/// Anomalies are evaluated for every category in the current month, in its
/// breakdown order. A category missing from (or zero in) the previous month
/// never produces an anomaly.
pub fn compare(current: &FeatureRecord, previous: &FeatureRecord) -> ComparisonRecord {
    let expense_change = current.total_expenses - previous.total_expenses;
    let ratio_change = round2(current.expense_ratio - previous.expense_ratio);

    let trend = if ratio_change > TREND_THRESHOLD {
        Trend::Worsening
    } else if ratio_change < -TREND_THRESHOLD {
        Trend::Improving
    } else {
        Trend::Stable
    };

    let mut anomalies = Vec::new();
    for (category, amount) in current.category_breakdown.iter() {
        let prev_amount = previous.category_breakdown.get(category).unwrap_or(0.0);
        if prev_amount <= 0.0 {
            continue;
        }

        let change = (amount - prev_amount) / prev_amount;
        if change > SPIKE_THRESHOLD {
            anomalies.push(Anomaly::spike(category));
        } else if change < DROP_THRESHOLD {
            anomalies.push(Anomaly::drop(category));
        }
    }

    debug!(
        current = %current.month,
        previous = %previous.month,
        expense_change,
        ratio_change,
        trend = %trend,
        anomalies = anomalies.len(),
        "Compared months"
    );

    ComparisonRecord {
        expense_change,
        ratio_change,
        trend,
        anomalies,
    }
}
