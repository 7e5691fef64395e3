//! User-authored validation rules for imported lines.

pub mod defaults;
pub mod evaluator;
pub mod rules;

pub use defaults::default_rule_templates;
pub use evaluator::{
    evaluate, evaluate_batch, test_rule, BatchEvaluation, RuleOutcome, RuleViolation,
    SkippedRule, TestRuleOutcome, TestValue,
};
pub use rules::{
    compile, LineFacts, RuleDefinition, RuleEvaluationError, RuleSeverity, RuleType,
    TargetField, ValidationRule,
};

use crate::error::CoreError;

/// Maximum length of a rule name.
pub const MAX_RULE_NAME_LEN: usize = 200;

/// Check a rule before it is persisted.
///
/// Rejects blank or overlong names and anything [`compile`] rejects.
pub fn validate_definition(definition: &RuleDefinition) -> Result<(), CoreError> {
    let name = definition.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Rule name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_RULE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Rule name must be at most {MAX_RULE_NAME_LEN} characters"
        )));
    }
    compile(definition)?;
    Ok(())
}
