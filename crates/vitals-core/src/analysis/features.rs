//! Feature extraction
//!
//! Turns one month's raw income/expense list into a `FeatureRecord`.
//!
//! Inputs are validated up front so the ratio and share divisions are
//! always defined:
//! - income must be finite and positive
//! - the expense list must be non-empty
//! - each line needs a non-blank category and a finite, non-negative amount
//! - the summed total must itself be finite
//!
//! When every amount is zero the dominant category is the first one listed
//! and its share is reported as 0.0.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CategoryBreakdown, FeatureRecord, MonthlySnapshot, RiskFlag};

use super::{round2, CATEGORY_DOMINANCE_SHARE, HIGH_EXPENSE_RATIO};

/// Check that a snapshot can go through feature extraction
pub fn validate(snapshot: &MonthlySnapshot) -> Result<()> {
    if !snapshot.income.is_finite() || snapshot.income <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "income for {} must be greater than zero (got {})",
            snapshot.month, snapshot.income
        )));
    }

    if snapshot.expenses.is_empty() {
        return Err(Error::EmptyExpenses(snapshot.month.clone()));
    }

    for (index, line) in snapshot.expenses.iter().enumerate() {
        if line.category.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "expense #{} in {} has an empty category",
                index + 1,
                snapshot.month
            )));
        }
        if !line.amount.is_finite() || line.amount < 0.0 {
            return Err(Error::InvalidInput(format!(
                "expense '{}' in {} must be a non-negative amount (got {})",
                line.category, snapshot.month, line.amount
            )));
        }
    }

    let total: f64 = snapshot.expenses.iter().map(|line| line.amount).sum();
    if !total.is_finite() {
        return Err(Error::InvalidInput(format!(
            "total expenses for {} are too large to represent",
            snapshot.month
        )));
    }

    Ok(())
}

/// Extract the normalized feature record for one month
pub fn extract(snapshot: &MonthlySnapshot) -> Result<FeatureRecord> {
    validate(snapshot)?;

    let mut breakdown = CategoryBreakdown::new();
    let mut total_expenses = 0.0;
    for line in &snapshot.expenses {
        breakdown.add(&line.category, line.amount);
        total_expenses += line.amount;
    }

    let savings = snapshot.income - total_expenses;
    let expense_ratio = round2(total_expenses / snapshot.income);

    let (dominant_category, dominant_amount) = breakdown
        .dominant()
        .map(|(name, amount)| (name.to_string(), amount))
        .ok_or_else(|| Error::EmptyExpenses(snapshot.month.clone()))?;

    let dominant_share = if total_expenses > 0.0 {
        round2(dominant_amount / total_expenses)
    } else {
        0.0
    };

    let mut risk_flags = Vec::new();
    if expense_ratio > HIGH_EXPENSE_RATIO {
        risk_flags.push(RiskFlag::HighExpenseRatio);
    }
    if dominant_share > CATEGORY_DOMINANCE_SHARE {
        risk_flags.push(RiskFlag::CategoryDominance);
    }
    if savings < 0.0 {
        risk_flags.push(RiskFlag::NegativeSavings);
    }

    debug!(
        month = %snapshot.month,
        total_expenses,
        expense_ratio,
        dominant = %dominant_category,
        dominant_share,
        flags = ?risk_flags,
        "Extracted features"
    );

    Ok(FeatureRecord {
        month: snapshot.month.clone(),
        income: snapshot.income,
        total_expenses,
        savings,
        expense_ratio,
        dominant_category,
        dominant_share,
        category_breakdown: breakdown,
        risk_flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseLine;

    fn snapshot(income: f64, expenses: &[(&str, f64)]) -> MonthlySnapshot {
        MonthlySnapshot::new(
            "2024-03",
            income,
            expenses
                .iter()
                .map(|(category, amount)| ExpenseLine::new(*category, *amount))
                .collect(),
        )
    }

    #[test]
    fn test_balanced_month() {
        let features = extract(&snapshot(
            5000.0,
            &[("food", 1000.0), ("rent", 2000.0), ("fun", 500.0)],
        ))
        .unwrap();

        assert_eq!(features.total_expenses, 3500.0);
        assert_eq!(features.savings, 1500.0);
        assert_eq!(features.expense_ratio, 0.7);
        assert_eq!(features.dominant_category, "rent");
        assert_eq!(features.dominant_share, 0.57);
        // 0.57 is above the 0.4 dominance threshold
        assert_eq!(features.risk_flags, vec![RiskFlag::CategoryDominance]);
    }

    #[test]
    fn test_high_ratio_single_category() {
        let features = extract(&snapshot(3000.0, &[("rent", 2800.0)])).unwrap();

        assert_eq!(features.expense_ratio, 0.93);
        assert_eq!(features.dominant_share, 1.0);
        assert_eq!(features.savings, 200.0);
        assert_eq!(
            features.risk_flags,
            vec![RiskFlag::HighExpenseRatio, RiskFlag::CategoryDominance]
        );
    }

    #[test]
    fn test_negative_savings_raises_all_flags_in_order() {
        let features = extract(&snapshot(2000.0, &[("rent", 2500.0)])).unwrap();

        assert_eq!(features.savings, -500.0);
        assert_eq!(features.expense_ratio, 1.25);
        assert_eq!(
            features.risk_flags,
            vec![
                RiskFlag::HighExpenseRatio,
                RiskFlag::CategoryDominance,
                RiskFlag::NegativeSavings
            ]
        );
    }

    #[test]
    fn test_no_flags() {
        let features = extract(&snapshot(
            10000.0,
            &[("food", 1000.0), ("rent", 1000.0), ("fun", 1000.0)],
        ))
        .unwrap();

        assert_eq!(features.expense_ratio, 0.3);
        assert_eq!(features.dominant_category, "food");
        assert_eq!(features.dominant_share, 0.33);
        assert!(features.risk_flags.is_empty());
    }

    #[test]
    fn test_thresholds_are_strict() {
        // ratio exactly 0.85, share exactly 0.4
        let features = extract(&snapshot(
            1000.0,
            &[("rent", 340.0), ("food", 255.0), ("fun", 255.0)],
        ))
        .unwrap();

        assert_eq!(features.expense_ratio, 0.85);
        assert_eq!(features.dominant_share, 0.4);
        assert!(features.risk_flags.is_empty());
    }

    #[test]
    fn test_ratio_rounded_before_threshold() {
        // 0.854 rounds down to 0.85 and does not trip the flag
        let features = extract(&snapshot(1000.0, &[("a", 300.0), ("b", 300.0), ("c", 254.0)]))
            .unwrap();
        assert_eq!(features.expense_ratio, 0.85);
        assert!(!features.has_flag(RiskFlag::HighExpenseRatio));
    }

    #[test]
    fn test_ratio_midpoint_rounds_to_even() {
        let eighth = extract(&snapshot(8000.0, &[("food", 1000.0)])).unwrap();
        assert_eq!(eighth.expense_ratio, 0.12);

        let five_eighths = extract(&snapshot(8000.0, &[("food", 5000.0)])).unwrap();
        assert_eq!(five_eighths.expense_ratio, 0.62);

        // share 1/8 of total
        let share = extract(&snapshot(
            10000.0,
            &[("rent", 7000.0), ("food", 1000.0)],
        ))
        .unwrap();
        assert_eq!(share.dominant_share, 0.88);
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let result = extract(&snapshot(1000.0, &[("rent", f64::MAX), ("food", f64::MAX)]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_categories_accumulate() {
        let features = extract(&snapshot(
            1000.0,
            &[("food", 100.0), ("rent", 150.0), ("food", 100.0)],
        ))
        .unwrap();

        assert_eq!(features.category_breakdown.len(), 2);
        assert_eq!(features.category_breakdown.get("food"), Some(200.0));
        assert_eq!(features.dominant_category, "food");
    }

    #[test]
    fn test_extract_is_deterministic() {
        let input = snapshot(4200.0, &[("food", 700.0), ("rent", 1400.0), ("gym", 60.0)]);
        assert_eq!(extract(&input).unwrap(), extract(&input).unwrap());
    }

    #[test]
    fn test_zero_income_rejected() {
        let err = extract(&snapshot(0.0, &[("rent", 10.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.is_client_error());

        let err = extract(&snapshot(-5.0, &[("rent", 10.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = extract(&snapshot(f64::NAN, &[("rent", 10.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_empty_expenses_rejected() {
        let err = extract(&snapshot(1000.0, &[])).unwrap_err();
        assert!(matches!(err, Error::EmptyExpenses(ref month) if month == "2024-03"));
    }

    #[test]
    fn test_invalid_lines_rejected() {
        let err = extract(&snapshot(1000.0, &[("food", -1.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = extract(&snapshot(1000.0, &[("  ", 10.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = extract(&snapshot(1000.0, &[("food", f64::INFINITY)])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_all_zero_expenses_default_share() {
        let features = extract(&snapshot(1000.0, &[("food", 0.0), ("rent", 0.0)])).unwrap();

        assert_eq!(features.total_expenses, 0.0);
        assert_eq!(features.expense_ratio, 0.0);
        assert_eq!(features.dominant_category, "food");
        assert_eq!(features.dominant_share, 0.0);
        assert!(features.risk_flags.is_empty());
    }

    #[test]
    fn test_high_ratio_flag_matches_ratio() {
        for (income, spent) in [(1000.0, 100.0), (1000.0, 851.0), (1000.0, 860.0), (500.0, 900.0)] {
            let features = extract(&snapshot(income, &[("a", spent / 2.0), ("b", spent / 2.0)]))
                .unwrap();
            assert_eq!(
                features.has_flag(RiskFlag::HighExpenseRatio),
                features.expense_ratio > HIGH_EXPENSE_RATIO
            );
            assert_eq!(
                features.has_flag(RiskFlag::NegativeSavings),
                features.savings < 0.0
            );
        }
    }
}
