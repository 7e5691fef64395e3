//! Rule evaluator. Pure logic, no database access.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::rules::{
    compile, Check, CompiledRule, FieldValue, LineFacts, RuleDefinition, RuleEvaluationError,
    RuleSeverity, TargetField, ValidationRule,
};
use crate::types::DbId;

// ── Result types ─────────────────────────────────────────────────────

/// Outcome of evaluating one rule against one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub violated: bool,
    pub severity: RuleSeverity,
    /// The violation message, or an empty string when the rule passed.
    pub message: String,
}

/// A rule violation found while evaluating a batch of lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleViolation {
    pub rule_id: DbId,
    pub rule_name: String,
    pub rule_type: String,
    pub field: String,
    pub severity: RuleSeverity,
    pub message: String,
    /// Zero-based position of the line in the evaluated batch.
    pub line_index: usize,
    pub item_code: String,
}

/// A rule left out of a batch evaluation because it could not be compiled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRule {
    pub rule_id: DbId,
    pub rule_name: String,
    pub reason: String,
}

/// Aggregated result of evaluating a rule set against a batch of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchEvaluation {
    /// Number of enabled rules that were actually evaluated.
    pub rules_evaluated: usize,
    /// Violations ordered by line, then by rule order.
    pub violations: Vec<RuleViolation>,
    pub skipped_rules: Vec<SkippedRule>,
}

impl BatchEvaluation {
    /// Whether any violation carries [`RuleSeverity::Error`].
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == RuleSeverity::Error)
    }
}

// ── Single-line evaluation ───────────────────────────────────────────

/// Evaluate one rule against one line.
///
/// Returns `Ok(None)` when the rule does not apply: it is disabled, or it is
/// scoped to a category the line does not belong to. `duplicate_check` rules
/// never fire on a single line; use [`evaluate_batch`] for them.
pub fn evaluate(
    rule: &RuleDefinition,
    target: &LineFacts,
) -> Result<Option<RuleOutcome>, RuleEvaluationError> {
    if !rule.enabled || !in_scope(rule, target) {
        return Ok(None);
    }
    let compiled = compile(rule)?;
    Ok(Some(evaluate_line(&compiled, target)))
}

fn in_scope(rule: &RuleDefinition, target: &LineFacts) -> bool {
    match rule.category.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(category) => target.category.as_deref() == Some(category),
    }
}

fn evaluate_line(rule: &CompiledRule<'_>, target: &LineFacts) -> RuleOutcome {
    let severity = rule.definition.severity;
    let label = rule.field.label();

    let violation = match (&rule.check, target.value(rule.field)) {
        (Check::Below(bound), FieldValue::Number(Some(v))) if v < *bound => Some(format!(
            "{label} ({v}) is below the minimum allowed ({bound})"
        )),
        (Check::Above(bound), FieldValue::Number(Some(v))) if v > *bound => Some(format!(
            "{label} ({v}) is above the maximum allowed ({bound})"
        )),
        (Check::Matches(re), FieldValue::Text(s)) if !re.is_match(s) => Some(format!(
            "{label} \"{s}\" does not match the expected pattern ({})",
            re.as_str()
        )),
        _ => None,
    };

    match violation {
        Some(default_message) => RuleOutcome {
            violated: true,
            severity,
            message: custom_or(rule.definition, default_message),
        },
        None => RuleOutcome {
            violated: false,
            severity,
            message: String::new(),
        },
    }
}

fn custom_or(rule: &RuleDefinition, default_message: String) -> String {
    match rule.message.as_deref().map(str::trim) {
        Some(custom) if !custom.is_empty() => custom.to_string(),
        _ => default_message,
    }
}

// ── Batch evaluation ─────────────────────────────────────────────────

/// Evaluate every enabled rule against a batch of lines.
///
/// Disabled rules are skipped without trace. A rule that fails to compile is
/// reported in [`BatchEvaluation::skipped_rules`] and does not stop the
/// remaining rules.
pub fn evaluate_batch(rules: &[ValidationRule], lines: &[LineFacts]) -> BatchEvaluation {
    let mut result = BatchEvaluation::default();

    for rule in rules.iter().filter(|r| r.definition.enabled) {
        let compiled = match compile(&rule.definition) {
            Ok(compiled) => compiled,
            Err(err) => {
                result.skipped_rules.push(SkippedRule {
                    rule_id: rule.id,
                    rule_name: rule.definition.name.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        result.rules_evaluated += 1;

        let scoped: Vec<(usize, &LineFacts)> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| in_scope(&rule.definition, line))
            .collect();

        match &compiled.check {
            Check::Unique(fields) => {
                push_duplicates(&mut result.violations, rule, &compiled, fields, &scoped);
            }
            _ => {
                for (index, line) in scoped {
                    let outcome = evaluate_line(&compiled, line);
                    if outcome.violated {
                        result
                            .violations
                            .push(violation(rule, &compiled, index, line, outcome.message));
                    }
                }
            }
        }
    }

    // Stable: keeps rule order within a line.
    result.violations.sort_by_key(|v| v.line_index);
    result
}

fn push_duplicates(
    out: &mut Vec<RuleViolation>,
    rule: &ValidationRule,
    compiled: &CompiledRule<'_>,
    fields: &[TargetField],
    scoped: &[(usize, &LineFacts)],
) {
    let mut groups: Vec<(Vec<String>, Vec<usize>)> = Vec::new();
    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();

    for (slot, (_, line)) in scoped.iter().enumerate() {
        let key: Vec<String> = fields.iter().map(|f| line.display(*f)).collect();
        match positions.get(&key) {
            Some(&group) => groups[group].1.push(slot),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![slot]));
            }
        }
    }

    let label = match fields {
        [single] => single.label(),
        _ => "Value",
    };

    for (key, slots) in groups.into_iter().filter(|(_, slots)| slots.len() > 1) {
        let line_numbers = slots
            .iter()
            .map(|&slot| (scoped[slot].0 + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let default_message = format!(
            "Duplicate {} \"{}\" found on lines {line_numbers}",
            label.to_lowercase(),
            key.join(", ")
        );
        for slot in slots {
            let (index, line) = scoped[slot];
            let message = custom_or(&rule.definition, default_message.clone());
            out.push(violation(rule, compiled, index, line, message));
        }
    }
}

fn violation(
    rule: &ValidationRule,
    compiled: &CompiledRule<'_>,
    line_index: usize,
    line: &LineFacts,
    message: String,
) -> RuleViolation {
    RuleViolation {
        rule_id: rule.id,
        rule_name: rule.definition.name.clone(),
        rule_type: compiled.rule_type.as_str().to_string(),
        field: compiled.field.as_str().to_string(),
        severity: rule.definition.severity,
        message,
        line_index,
        item_code: line.item_code.clone(),
    }
}

// ── Rule preview ─────────────────────────────────────────────────────

/// A scalar supplied when previewing a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestValue {
    Number(f64),
    Text(String),
}

impl TestValue {
    fn as_number(&self) -> Result<f64, RuleEvaluationError> {
        let parsed = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };
        parsed.filter(|n| n.is_finite()).ok_or_else(|| {
            RuleEvaluationError::InvalidTestValue(format!("'{}' is not a number", self.as_text()))
        })
    }

    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Decision and explanation for a rule preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRuleOutcome {
    pub violated: bool,
    pub reason: String,
}

/// Decide whether a single value would violate a rule.
///
/// The enabled flag and category scope are ignored so a rule can be
/// previewed while it is still switched off.
pub fn test_rule(
    rule: &RuleDefinition,
    value: &TestValue,
) -> Result<TestRuleOutcome, RuleEvaluationError> {
    let compiled = compile(rule)?;

    let outcome = match &compiled.check {
        Check::Below(bound) => {
            let v = value.as_number()?;
            let violated = v < *bound;
            let verb = if violated { "is" } else { "is not" };
            TestRuleOutcome {
                violated,
                reason: format!("Value {v} {verb} below the minimum of {bound}"),
            }
        }
        Check::Above(bound) => {
            let v = value.as_number()?;
            let violated = v > *bound;
            let verb = if violated { "is" } else { "is not" };
            TestRuleOutcome {
                violated,
                reason: format!("Value {v} {verb} above the maximum of {bound}"),
            }
        }
        Check::Matches(re) => {
            let s = value.as_text();
            let violated = !re.is_match(&s);
            let verb = if violated { "does not match" } else { "matches" };
            TestRuleOutcome {
                violated,
                reason: format!("Value \"{s}\" {verb} pattern {}", re.as_str()),
            }
        }
        Check::Unique(_) => TestRuleOutcome {
            violated: false,
            reason: "Duplicate checks compare lines within a batch and cannot be decided from a single value".to_string(),
        },
    };
    Ok(outcome)
}
