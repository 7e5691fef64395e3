//! Variance alert types and the alert generator.

use serde::{Deserialize, Serialize};

use crate::variance::LineStatus;

/// Kind of system-raised alert attached to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    VarianceHigh,
    VarianceCritical,
    /// Reserved for adapters that detect absent required fields. Never
    /// produced by [`alerts_for`].
    MissingData,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VarianceHigh => "variance_high",
            Self::VarianceCritical => "variance_critical",
            Self::MissingData => "missing_data",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "variance_high" => Some(Self::VarianceHigh),
            "variance_critical" => Some(Self::VarianceCritical),
            "missing_data" => Some(Self::MissingData),
            _ => None,
        }
    }
}

/// Alert severity, distinct from validation rule severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// An alert produced for a line, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedAlert {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Build the alerts for a classified line.
///
/// Emits exactly one alert for `warning` and `critical` lines and none for
/// `on_track`. The percentage is rendered with two decimals.
pub fn alerts_for(
    item_code: &str,
    variance_percentage: f64,
    status: LineStatus,
) -> Vec<GeneratedAlert> {
    match status {
        LineStatus::Critical => vec![GeneratedAlert {
            alert_type: AlertType::VarianceCritical,
            severity: AlertSeverity::Critical,
            message: format!(
                "Critical variance detected: {variance_percentage:.2}% for item {item_code}"
            ),
        }],
        LineStatus::Warning => vec![GeneratedAlert {
            alert_type: AlertType::VarianceHigh,
            severity: AlertSeverity::High,
            message: format!(
                "High variance detected: {variance_percentage:.2}% for item {item_code}"
            ),
        }],
        LineStatus::OnTrack => Vec::new(),
    }
}
