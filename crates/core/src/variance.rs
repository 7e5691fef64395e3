//! Planned-vs-executed variance classification.
//!
//! Every imported line is classified by how far its executed quantity
//! deviates from the planned one. The thresholds are fixed for this version
//! of the service and boundary values fall into the more severe bucket.

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────

/// Absolute variance percentage at which a line becomes `warning`.
pub const VARIANCE_WARNING_THRESHOLD: f64 = 10.0;

/// Absolute variance percentage at which a line becomes `critical`.
pub const VARIANCE_CRITICAL_THRESHOLD: f64 = 20.0;

// ── Types ────────────────────────────────────────────────────────────

/// Health classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    OnTrack,
    Warning,
    Critical,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Parse the stored string form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "on_track" => Some(Self::OnTrack),
            "warning" => Some(Self::Warning),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one planned/executed pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarianceOutcome {
    /// `executed - planned`.
    pub variance: f64,
    /// `variance / planned * 100`, or `0` when nothing was planned.
    pub variance_percentage: f64,
    pub status: LineStatus,
}

// ── Calculation ──────────────────────────────────────────────────────

/// Classify a line from its planned and executed quantities.
///
/// An item with nothing planned cannot be over or under in percentage terms,
/// so `planned == 0` always yields `0%` and [`LineStatus::OnTrack`].
pub fn classify(planned: f64, executed: f64) -> VarianceOutcome {
    let variance = executed - planned;

    if planned == 0.0 {
        return VarianceOutcome {
            variance,
            variance_percentage: 0.0,
            status: LineStatus::OnTrack,
        };
    }

    let variance_percentage = variance * 100.0 / planned;
    VarianceOutcome {
        variance,
        variance_percentage,
        status: status_for_percentage(variance_percentage),
    }
}

/// Map a variance percentage to its status bucket.
///
/// The comparison is made on the exact percentage that is reported, so a
/// line's status never disagrees with its `variance_percentage`.
pub fn status_for_percentage(variance_percentage: f64) -> LineStatus {
    let magnitude = variance_percentage.abs();
    if magnitude >= VARIANCE_CRITICAL_THRESHOLD {
        LineStatus::Critical
    } else if magnitude >= VARIANCE_WARNING_THRESHOLD {
        LineStatus::Warning
    } else {
        LineStatus::OnTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_boundary_is_inclusive() {
        let outcome = classify(100.0, 120.0);
        assert_eq!(outcome.variance, 20.0);
        assert_eq!(outcome.variance_percentage, 20.0);
        assert_eq!(outcome.status, LineStatus::Critical);
    }

    #[test]
    fn warning_boundary_is_inclusive() {
        assert_eq!(classify(100.0, 110.0).status, LineStatus::Warning);
        assert_eq!(classify(100.0, 109.0).status, LineStatus::OnTrack);
    }

    #[test]
    fn under_execution_uses_absolute_value() {
        let outcome = classify(100.0, 75.0);
        assert_eq!(outcome.variance, -25.0);
        assert_eq!(outcome.variance_percentage, -25.0);
        assert_eq!(outcome.status, LineStatus::Critical);
        assert_eq!(classify(100.0, 88.0).status, LineStatus::Warning);
    }

    #[test]
    fn zero_planned_is_always_on_track() {
        for executed in [0.0, 1.0, 500.0, -3.0] {
            let outcome = classify(0.0, executed);
            assert_eq!(outcome.variance_percentage, 0.0);
            assert_eq!(outcome.status, LineStatus::OnTrack);
            assert_eq!(outcome.variance, executed);
        }
    }

    #[test]
    fn percentage_just_below_a_threshold_stays_in_the_lower_bucket() {
        // 3.3 - 3.0 is 0.2999999999999998 in binary floating point.
        let outcome = classify(3.0, 3.3);
        assert!(outcome.variance_percentage < VARIANCE_WARNING_THRESHOLD);
        assert_eq!(outcome.status, LineStatus::OnTrack);

        let outcome = classify(1e12, 1.2e12 - 1.0);
        assert!(outcome.variance_percentage < VARIANCE_CRITICAL_THRESHOLD);
        assert_eq!(outcome.status, LineStatus::Warning);
    }

    #[test]
    fn status_agrees_with_reported_percentage() {
        let pairs = [(3.0, 3.3), (3.0, 2.7), (1e12, 1.2e12 - 1.0), (7.0, 7.7), (0.3, 0.36)];
        for (planned, executed) in pairs {
            let outcome = classify(planned, executed);
            assert_eq!(
                outcome.status,
                status_for_percentage(outcome.variance_percentage),
                "planned = {planned}, executed = {executed}"
            );
            let pct = outcome.variance_percentage.abs();
            assert_eq!(outcome.status == LineStatus::Critical, pct >= 20.0);
            assert_eq!(outcome.status == LineStatus::OnTrack, pct < 10.0);
        }
    }

    #[test]
    fn status_matches_thresholds_across_a_sweep() {
        for executed in 0..=300 {
            let outcome = classify(100.0, executed as f64);
            let pct = outcome.variance_percentage.abs();
            let expected = if pct >= 20.0 {
                LineStatus::Critical
            } else if pct >= 10.0 {
                LineStatus::Warning
            } else {
                LineStatus::OnTrack
            };
            assert_eq!(outcome.status, expected, "executed = {executed}");
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [LineStatus::OnTrack, LineStatus::Warning, LineStatus::Critical] {
            assert_eq!(LineStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LineStatus::parse("late"), None);
    }
}
