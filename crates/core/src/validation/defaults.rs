//! Starter rule set offered to new projects.

use serde_json::json;

use super::rules::{RuleDefinition, RuleSeverity, RuleType, TargetField};

/// The default rules a project can seed itself with.
pub fn default_rule_templates() -> Vec<RuleDefinition> {
    vec![
        template(
            "Minimum reasonable unit price",
            RuleType::PriceMin,
            TargetField::UnitPrice,
            json!({ "value": 0.01 }),
            RuleSeverity::Warning,
            "Unit price is very low, check that it is correct",
        ),
        template(
            "Suspicious maximum unit price",
            RuleType::PriceMax,
            TargetField::UnitPrice,
            json!({ "value": 10000 }),
            RuleSeverity::Warning,
            "Unit price is very high, check that it is correct",
        ),
        template(
            "Minimum quantity",
            RuleType::QuantityMin,
            TargetField::PlannedQuantity,
            json!({ "value": 0.01 }),
            RuleSeverity::Error,
            "Quantity must be greater than zero",
        ),
        template(
            "Duplicate item code",
            RuleType::DuplicateCheck,
            TargetField::ItemCode,
            json!({ "fields": ["item_code"] }),
            RuleSeverity::Warning,
            "Duplicate item code found",
        ),
    ]
}

fn template(
    name: &str,
    rule_type: RuleType,
    field: TargetField,
    condition: serde_json::Value,
    severity: RuleSeverity,
    message: &str,
) -> RuleDefinition {
    RuleDefinition {
        name: name.to_string(),
        rule_type: rule_type.as_str().to_string(),
        field: field.as_str().to_string(),
        condition,
        severity,
        message: Some(message.to_string()),
        category: None,
        enabled: true,
    }
}
