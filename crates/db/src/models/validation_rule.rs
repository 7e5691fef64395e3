//! MQT validation rule model.

use mqt_core::error::CoreError;
use mqt_core::types::{DbId, Timestamp};
use mqt_core::validation::{RuleDefinition, RuleSeverity, ValidationRule};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mqt_validation_rules` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MqtValidationRuleRow {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub rule_type: String,
    pub field: String,
    pub condition: serde_json::Value,
    pub severity: String,
    pub message: Option<String>,
    pub category: Option<String>,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a validation rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMqtValidationRule {
    pub project_id: DbId,
    pub name: String,
    pub rule_type: String,
    pub field: String,
    pub condition: serde_json::Value,
    pub severity: String,
    pub message: Option<String>,
    pub category: Option<String>,
    pub enabled: Option<bool>,
}

/// DTO for updating a validation rule. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMqtValidationRule {
    pub name: Option<String>,
    pub rule_type: Option<String>,
    pub field: Option<String>,
    pub condition: Option<serde_json::Value>,
    pub severity: Option<String>,
    pub message: Option<String>,
    pub category: Option<String>,
    pub enabled: Option<bool>,
}

impl CreateMqtValidationRule {
    pub fn new(project_id: DbId, definition: &RuleDefinition) -> Self {
        Self {
            project_id,
            name: definition.name.trim().to_string(),
            rule_type: definition.rule_type.clone(),
            field: definition.field.clone(),
            condition: definition.condition.clone(),
            severity: definition.severity.as_str().to_string(),
            message: definition.message.clone(),
            category: definition.category.clone(),
            enabled: Some(definition.enabled),
        }
    }
}

impl UpdateMqtValidationRule {
    /// A patch that overwrites every column with `definition`.
    pub fn replace_with(definition: &RuleDefinition) -> Self {
        Self {
            name: Some(definition.name.trim().to_string()),
            rule_type: Some(definition.rule_type.clone()),
            field: Some(definition.field.clone()),
            condition: Some(definition.condition.clone()),
            severity: Some(definition.severity.as_str().to_string()),
            message: Some(definition.message.clone().unwrap_or_default()),
            category: Some(definition.category.clone().unwrap_or_default()),
            enabled: Some(definition.enabled),
        }
    }
}

impl TryFrom<MqtValidationRuleRow> for ValidationRule {
    type Error = CoreError;

    fn try_from(row: MqtValidationRuleRow) -> Result<Self, Self::Error> {
        let severity = RuleSeverity::parse(&row.severity).ok_or_else(|| {
            CoreError::Internal(format!(
                "validation rule {} has unknown severity '{}'",
                row.id, row.severity
            ))
        })?;
        Ok(ValidationRule {
            id: row.id,
            project_id: row.project_id,
            definition: RuleDefinition {
                name: row.name,
                rule_type: row.rule_type,
                field: row.field,
                condition: row.condition,
                severity,
                message: row.message.filter(|m| !m.is_empty()),
                category: row.category.filter(|c| !c.is_empty()),
                enabled: row.enabled,
            },
        })
    }
}
