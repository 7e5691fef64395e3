//! Validation rule management and on-demand validation of stored lines.

use std::sync::Arc;

use mqt_core::error::CoreError;
use mqt_core::types::DbId;
use mqt_core::validation::{
    self, evaluate_batch, BatchEvaluation, LineFacts, RuleDefinition, RuleSeverity, SkippedRule,
    TestRuleOutcome, TestValue, ValidationRule,
};
use mqt_db::models::line::MqtLine;
use mqt_db::models::validation_rule::{CreateMqtValidationRule, UpdateMqtValidationRule};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::store::{LineRepository, MqtStore, RuleRepository};

/// Partial update of a rule. Absent fields keep their current value; an empty
/// `message` or `category` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulePatch {
    pub name: Option<String>,
    pub rule_type: Option<String>,
    pub field: Option<String>,
    pub condition: Option<serde_json::Value>,
    pub severity: Option<RuleSeverity>,
    pub message: Option<String>,
    pub category: Option<String>,
    pub enabled: Option<bool>,
}

impl RulePatch {
    fn apply(self, definition: &mut RuleDefinition) {
        let non_empty = |s: String| (!s.trim().is_empty()).then_some(s);

        if let Some(name) = self.name {
            definition.name = name;
        }
        if let Some(rule_type) = self.rule_type {
            definition.rule_type = rule_type;
        }
        if let Some(field) = self.field {
            definition.field = field;
        }
        if let Some(condition) = self.condition {
            definition.condition = condition;
        }
        if let Some(severity) = self.severity {
            definition.severity = severity;
        }
        if let Some(message) = self.message {
            definition.message = non_empty(message);
        }
        if let Some(category) = self.category {
            definition.category = non_empty(category);
        }
        if let Some(enabled) = self.enabled {
            definition.enabled = enabled;
        }
    }
}

/// Rule management operations for a project.
#[derive(Clone)]
pub struct RuleService {
    store: Arc<dyn MqtStore>,
}

impl RuleService {
    pub fn new(store: Arc<dyn MqtStore>) -> Self {
        Self { store }
    }

    pub async fn list_rules(&self, project_id: DbId) -> Result<Vec<ValidationRule>, PipelineError> {
        load_rules(self.store.as_ref(), project_id).await
    }

    /// Validate and persist a new rule.
    pub async fn create_rule(
        &self,
        project_id: DbId,
        definition: &RuleDefinition,
    ) -> Result<ValidationRule, PipelineError> {
        validation::validate_definition(definition)?;
        let row = self
            .store
            .create_rule(&CreateMqtValidationRule::new(project_id, definition))
            .await?;
        tracing::info!(rule_id = row.id, project_id, "Validation rule created");
        Ok(ValidationRule::try_from(row)?)
    }

    /// Apply a patch to an existing rule. The merged rule must still be valid.
    pub async fn update_rule(
        &self,
        id: DbId,
        patch: RulePatch,
    ) -> Result<ValidationRule, PipelineError> {
        let existing = self
            .store
            .find_rule(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ValidationRule",
                id,
            })?;
        let mut rule = ValidationRule::try_from(existing)?;
        patch.apply(&mut rule.definition);
        validation::validate_definition(&rule.definition)?;

        let row = self
            .store
            .update_rule(id, &UpdateMqtValidationRule::replace_with(&rule.definition))
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ValidationRule",
                id,
            })?;
        tracing::info!(rule_id = id, "Validation rule updated");
        Ok(ValidationRule::try_from(row)?)
    }

    pub async fn delete_rule(&self, id: DbId) -> Result<(), PipelineError> {
        if !self.store.delete_rule(id).await? {
            return Err(CoreError::NotFound {
                entity: "ValidationRule",
                id,
            }
            .into());
        }
        tracing::info!(rule_id = id, "Validation rule deleted");
        Ok(())
    }

    pub async fn toggle_rule(&self, id: DbId, enabled: bool) -> Result<ValidationRule, PipelineError> {
        let row = self
            .store
            .set_rule_enabled(id, enabled)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ValidationRule",
                id,
            })?;
        tracing::info!(rule_id = id, enabled, "Validation rule toggled");
        Ok(ValidationRule::try_from(row)?)
    }

    /// Preview a rule against a single value without persisting anything.
    pub fn test_rule(
        definition: &RuleDefinition,
        value: &TestValue,
    ) -> Result<TestRuleOutcome, PipelineError> {
        validation::test_rule(definition, value).map_err(|e| CoreError::from(e).into())
    }

    /// Evaluate the project's rules against its stored lines, optionally
    /// restricted to one import.
    pub async fn validate_lines(
        &self,
        project_id: DbId,
        import_id: Option<DbId>,
    ) -> Result<BatchEvaluation, PipelineError> {
        let rules = load_rules(self.store.as_ref(), project_id).await?;
        let lines = self.store.list_lines(project_id, import_id).await?;
        let facts: Vec<LineFacts> = lines.iter().map(line_facts).collect();

        let evaluation = evaluate_batch(&rules, &facts);
        log_skipped_rules(&evaluation.skipped_rules);
        tracing::debug!(
            project_id,
            lines = facts.len(),
            violations = evaluation.violations.len(),
            "Validated stored MQT lines"
        );
        Ok(evaluation)
    }
}

/// Load a project's rules as domain values.
pub(crate) async fn load_rules(
    store: &dyn MqtStore,
    project_id: DbId,
) -> Result<Vec<ValidationRule>, PipelineError> {
    store
        .list_rules(project_id)
        .await?
        .into_iter()
        .map(|row| ValidationRule::try_from(row).map_err(PipelineError::from))
        .collect()
}

pub(crate) fn log_skipped_rules(skipped: &[SkippedRule]) {
    for rule in skipped {
        tracing::warn!(
            rule_id = rule.rule_id,
            rule_name = %rule.rule_name,
            reason = %rule.reason,
            "Skipping malformed validation rule"
        );
    }
}

fn line_facts(line: &MqtLine) -> LineFacts {
    LineFacts {
        item_code: line.item_code.clone(),
        item_description: line.item_description.clone(),
        unit: line.unit.clone(),
        category: line.category.clone(),
        planned_quantity: line.planned_quantity,
        executed_quantity: line.executed_quantity,
        variance: line.variance,
        variance_percentage: line.variance_percentage,
        unit_price: line.unit_price,
    }
}
