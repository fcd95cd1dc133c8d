//! Financial-health analysis stages
//!
//! Three pure functions over request-local data:
//! - `features::extract`: raw snapshot -> `FeatureRecord`
//! - `trend::compare`: two feature records -> `ComparisonRecord`
//! - `decision::interpret`: features + optional comparison -> `Verdict`
//!
//! Thresholds are fixed constants. Ratios and shares are rounded to two
//! decimals before any threshold test.

pub mod decision;
pub mod features;
pub mod trend;

pub use decision::interpret;
pub use features::extract;
pub use trend::compare;

/// Expense ratio above which `HIGH_EXPENSE_RATIO` is raised
pub const HIGH_EXPENSE_RATIO: f64 = 0.85;

/// Dominant-category share above which `CATEGORY_DOMINANCE` is raised
pub const CATEGORY_DOMINANCE_SHARE: f64 = 0.4;

/// Ratio change beyond which the trend is worsening / improving
pub const TREND_THRESHOLD: f64 = 0.05;

/// Relative category growth above which a spike is reported
pub const SPIKE_THRESHOLD: f64 = 0.5;

/// Relative category decline below which a drop is reported
pub const DROP_THRESHOLD: f64 = -0.4;

/// Round to two decimal places, ties to even (0.125 -> 0.12)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.7), 0.7);
        assert_eq!(round2(2800.0 / 3000.0), 0.93);
        assert_eq!(round2(2000.0 / 3500.0), 0.57);
        assert_eq!(round2(-0.104), -0.1);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_round2_midpoints_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(0.12 - 0.07), 0.05);
    }
}
