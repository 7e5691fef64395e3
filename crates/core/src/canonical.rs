//! The canonical row shape produced by every source adapter.

use serde::{Deserialize, Serialize};

use crate::variance::{classify, VarianceOutcome};

/// One spreadsheet row after source-specific normalization.
///
/// Adapters never reject partially empty rows: missing text defaults to an
/// empty string and missing quantities to `0`. Judging whether such a row is
/// acceptable is left to the validation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub item_code: String,
    pub item_description: String,
    pub planned_quantity: f64,
    pub executed_quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CanonicalRow {
    /// Classify this row's planned vs executed quantities.
    pub fn variance(&self) -> VarianceOutcome {
        classify(self.planned_quantity, self.executed_quantity)
    }
}
