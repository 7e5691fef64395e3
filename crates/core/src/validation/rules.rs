//! Validation rule definitions and their statically-shaped conditions.
//!
//! Rules are stored with a free-form JSON `condition` next to their
//! `rule_type`. Before evaluation a rule is compiled: the rule type selects
//! which [`RuleCondition`] variant the payload must decode into, and the
//! target field is checked against the kind of value the condition compares.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalRow;
use crate::types::DbId;

// ── Rule type, severity, target field ────────────────────────────────

/// Which comparison a rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    PriceMin,
    PriceMax,
    CodePattern,
    QuantityMin,
    QuantityMax,
    DuplicateCheck,
}

impl RuleType {
    pub const ALL: [RuleType; 6] = [
        Self::PriceMin,
        Self::PriceMax,
        Self::CodePattern,
        Self::QuantityMin,
        Self::QuantityMax,
        Self::DuplicateCheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceMin => "price_min",
            Self::PriceMax => "price_max",
            Self::CodePattern => "code_pattern",
            Self::QuantityMin => "quantity_min",
            Self::QuantityMax => "quantity_max",
            Self::DuplicateCheck => "duplicate_check",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Field used when a rule does not name one.
    pub fn default_field(&self) -> TargetField {
        match self {
            Self::PriceMin | Self::PriceMax => TargetField::UnitPrice,
            Self::QuantityMin | Self::QuantityMax => TargetField::PlannedQuantity,
            Self::CodePattern | Self::DuplicateCheck => TargetField::ItemCode,
        }
    }
}

/// Severity attached to a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
}

impl RuleSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// Line attribute a rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    ItemCode,
    ItemDescription,
    Unit,
    Category,
    PlannedQuantity,
    ExecutedQuantity,
    Variance,
    VariancePercentage,
    UnitPrice,
}

/// Whether a field holds text or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

impl TargetField {
    pub const ALL: [TargetField; 9] = [
        Self::ItemCode,
        Self::ItemDescription,
        Self::Unit,
        Self::Category,
        Self::PlannedQuantity,
        Self::ExecutedQuantity,
        Self::Variance,
        Self::VariancePercentage,
        Self::UnitPrice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItemCode => "item_code",
            Self::ItemDescription => "item_description",
            Self::Unit => "unit",
            Self::Category => "category",
            Self::PlannedQuantity => "planned_quantity",
            Self::ExecutedQuantity => "executed_quantity",
            Self::Variance => "variance",
            Self::VariancePercentage => "variance_percentage",
            Self::UnitPrice => "unit_price",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::ItemCode | Self::ItemDescription | Self::Unit | Self::Category => FieldKind::Text,
            _ => FieldKind::Number,
        }
    }

    /// Human-readable label used in default messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ItemCode => "Item code",
            Self::ItemDescription => "Description",
            Self::Unit => "Unit",
            Self::Category => "Category",
            Self::PlannedQuantity => "Planned quantity",
            Self::ExecutedQuantity => "Executed quantity",
            Self::Variance => "Variance",
            Self::VariancePercentage => "Variance percentage",
            Self::UnitPrice => "Unit price",
        }
    }
}

// ── Condition payload ────────────────────────────────────────────────

/// A rule's condition, decoded according to its rule type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule_type", content = "condition", rename_all = "snake_case")]
pub enum RuleCondition {
    PriceMin(BoundCondition),
    PriceMax(BoundCondition),
    CodePattern(PatternCondition),
    QuantityMin(BoundCondition),
    QuantityMax(BoundCondition),
    DuplicateCheck(DuplicateCondition),
}

/// Single numeric bound used by the min/max rule types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundCondition {
    pub value: f64,
}

/// Regular expression the target must match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternCondition {
    pub pattern: String,
}

/// Fields whose combined value must be unique across a batch. An empty list
/// means "the rule's own target field".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCondition {
    #[serde(default)]
    pub fields: Vec<TargetField>,
}

impl RuleCondition {
    /// Decode a stored payload for the given rule type.
    pub fn decode(
        rule_type: RuleType,
        payload: &serde_json::Value,
    ) -> Result<Self, RuleEvaluationError> {
        let payload = match payload {
            serde_json::Value::Null => serde_json::json!({}),
            other => other.clone(),
        };
        let tagged = serde_json::json!({
            "rule_type": rule_type.as_str(),
            "condition": payload,
        });
        serde_json::from_value(tagged).map_err(|e| RuleEvaluationError::ConditionMismatch {
            rule_type: rule_type.as_str(),
            reason: e.to_string(),
        })
    }
}

// ── Rule definition ──────────────────────────────────────────────────

/// The user-authored part of a validation rule.
///
/// `rule_type`, `field` and `condition` are kept in their stored form so a
/// malformed rule can still be listed, edited and reported; [`compile`]
/// turns them into typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    pub rule_type: String,
    /// Target field; empty means [`RuleType::default_field`].
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub condition: serde_json::Value,
    pub severity: RuleSeverity,
    #[serde(default)]
    pub message: Option<String>,
    /// When set, the rule only applies to lines of this category.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A persisted validation rule owned by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub id: DbId,
    pub project_id: DbId,
    #[serde(flatten)]
    pub definition: RuleDefinition,
}

// ── Compilation ──────────────────────────────────────────────────────

/// The comparison a compiled rule performs.
#[derive(Debug, Clone)]
pub enum Check {
    Below(f64),
    Above(f64),
    Matches(Regex),
    Unique(Vec<TargetField>),
}

/// A rule whose type, field and condition have been decoded and checked.
#[derive(Debug, Clone)]
pub struct CompiledRule<'a> {
    pub definition: &'a RuleDefinition,
    pub rule_type: RuleType,
    pub field: TargetField,
    pub check: Check,
}

/// Decode and type-check a rule definition.
pub fn compile(definition: &RuleDefinition) -> Result<CompiledRule<'_>, RuleEvaluationError> {
    let rule_type = RuleType::parse(&definition.rule_type)
        .ok_or_else(|| RuleEvaluationError::UnknownRuleType(definition.rule_type.clone()))?;

    let field = if definition.field.trim().is_empty() {
        rule_type.default_field()
    } else {
        TargetField::parse(definition.field.trim())
            .ok_or_else(|| RuleEvaluationError::UnknownField(definition.field.clone()))?
    };

    let condition = RuleCondition::decode(rule_type, &definition.condition)?;

    let check = match condition {
        RuleCondition::PriceMin(b) | RuleCondition::QuantityMin(b) => {
            require_kind(rule_type, field, FieldKind::Number)?;
            Check::Below(finite_bound(b.value)?)
        }
        RuleCondition::PriceMax(b) | RuleCondition::QuantityMax(b) => {
            require_kind(rule_type, field, FieldKind::Number)?;
            Check::Above(finite_bound(b.value)?)
        }
        RuleCondition::CodePattern(p) => {
            require_kind(rule_type, field, FieldKind::Text)?;
            let regex = Regex::new(&p.pattern).map_err(|e| RuleEvaluationError::InvalidPattern {
                pattern: p.pattern.clone(),
                reason: e.to_string(),
            })?;
            Check::Matches(regex)
        }
        RuleCondition::DuplicateCheck(d) => {
            let fields = if d.fields.is_empty() {
                vec![field]
            } else {
                d.fields
            };
            Check::Unique(fields)
        }
    };

    Ok(CompiledRule {
        definition,
        rule_type,
        field,
        check,
    })
}

fn require_kind(
    rule_type: RuleType,
    field: TargetField,
    expected: FieldKind,
) -> Result<(), RuleEvaluationError> {
    if field.kind() == expected {
        Ok(())
    } else {
        Err(RuleEvaluationError::FieldTypeMismatch {
            rule_type: rule_type.as_str(),
            field: field.as_str(),
        })
    }
}

fn finite_bound(value: f64) -> Result<f64, RuleEvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RuleEvaluationError::InvalidBound(value))
    }
}

// ── Evaluation subject ───────────────────────────────────────────────

/// The facts about one line that rules can read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineFacts {
    pub item_code: String,
    pub item_description: String,
    pub unit: String,
    pub category: Option<String>,
    pub planned_quantity: f64,
    pub executed_quantity: f64,
    pub variance: f64,
    pub variance_percentage: f64,
    pub unit_price: Option<f64>,
}

impl From<&CanonicalRow> for LineFacts {
    fn from(row: &CanonicalRow) -> Self {
        let outcome = row.variance();
        Self {
            item_code: row.item_code.clone(),
            item_description: row.item_description.clone(),
            unit: row.unit.clone(),
            category: row.category.clone(),
            planned_quantity: row.planned_quantity,
            executed_quantity: row.executed_quantity,
            variance: outcome.variance,
            variance_percentage: outcome.variance_percentage,
            unit_price: row.unit_price,
        }
    }
}

/// A field value read from [`LineFacts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    /// `None` when the line has no value for the field (e.g. no unit price).
    Number(Option<f64>),
}

impl LineFacts {
    pub fn value(&self, field: TargetField) -> FieldValue<'_> {
        match field {
            TargetField::ItemCode => FieldValue::Text(&self.item_code),
            TargetField::ItemDescription => FieldValue::Text(&self.item_description),
            TargetField::Unit => FieldValue::Text(&self.unit),
            TargetField::Category => FieldValue::Text(self.category.as_deref().unwrap_or("")),
            TargetField::PlannedQuantity => FieldValue::Number(Some(self.planned_quantity)),
            TargetField::ExecutedQuantity => FieldValue::Number(Some(self.executed_quantity)),
            TargetField::Variance => FieldValue::Number(Some(self.variance)),
            TargetField::VariancePercentage => {
                FieldValue::Number(Some(self.variance_percentage))
            }
            TargetField::UnitPrice => FieldValue::Number(self.unit_price),
        }
    }

    /// Render a field for duplicate keys and messages.
    pub fn display(&self, field: TargetField) -> String {
        match self.value(field) {
            FieldValue::Text(s) => s.to_string(),
            FieldValue::Number(Some(n)) => n.to_string(),
            FieldValue::Number(None) => String::new(),
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────

/// Why a single rule could not be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleEvaluationError {
    #[error("unknown rule type '{0}'")]
    UnknownRuleType(String),

    #[error("unknown target field '{0}'")]
    UnknownField(String),

    #[error("condition does not match rule type {rule_type}: {reason}")]
    ConditionMismatch {
        rule_type: &'static str,
        reason: String,
    },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("rule type {rule_type} cannot be applied to field {field}")]
    FieldTypeMismatch {
        rule_type: &'static str,
        field: &'static str,
    },

    #[error("bound must be a finite number, got {0}")]
    InvalidBound(f64),

    #[error("test value cannot be used with this rule: {0}")]
    InvalidTestValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn definition(rule_type: &str, field: &str, condition: serde_json::Value) -> RuleDefinition {
        RuleDefinition {
            name: "rule".to_string(),
            rule_type: rule_type.to_string(),
            field: field.to_string(),
            condition,
            severity: RuleSeverity::Warning,
            message: None,
            category: None,
            enabled: true,
        }
    }

    #[test]
    fn decodes_each_condition_shape() {
        assert_eq!(
            RuleCondition::decode(RuleType::PriceMin, &json!({"value": 2.5})).unwrap(),
            RuleCondition::PriceMin(BoundCondition { value: 2.5 })
        );
        assert_eq!(
            RuleCondition::decode(RuleType::CodePattern, &json!({"pattern": "^A"})).unwrap(),
            RuleCondition::CodePattern(PatternCondition {
                pattern: "^A".to_string()
            })
        );
        assert_eq!(
            RuleCondition::decode(RuleType::DuplicateCheck, &json!({})).unwrap(),
            RuleCondition::DuplicateCheck(DuplicateCondition::default())
        );
        assert_eq!(
            RuleCondition::decode(RuleType::DuplicateCheck, &serde_json::Value::Null).unwrap(),
            RuleCondition::DuplicateCheck(DuplicateCondition::default())
        );
    }

    #[test]
    fn non_numeric_bound_is_a_mismatch() {
        let err = RuleCondition::decode(RuleType::PriceMax, &json!({"value": "ten"})).unwrap_err();
        assert_matches!(err, RuleEvaluationError::ConditionMismatch { rule_type: "price_max", .. });
    }

    #[test]
    fn pattern_payload_for_price_rule_is_a_mismatch() {
        let err = RuleCondition::decode(RuleType::PriceMin, &json!({"pattern": "x"})).unwrap_err();
        assert_matches!(err, RuleEvaluationError::ConditionMismatch { .. });
    }

    #[test]
    fn compile_uses_default_field() {
        let def = definition("price_min", "", json!({"value": 1}));
        let compiled = compile(&def).unwrap();
        assert_eq!(compiled.field, TargetField::UnitPrice);
        assert_matches!(compiled.check, Check::Below(v) if v == 1.0);
    }

    #[test]
    fn compile_rejects_numeric_rule_on_text_field() {
        let def = definition("quantity_max", "item_code", json!({"value": 1}));
        assert_matches!(
            compile(&def),
            Err(RuleEvaluationError::FieldTypeMismatch { field: "item_code", .. })
        );
    }

    #[test]
    fn compile_rejects_bad_regex() {
        let def = definition("code_pattern", "item_code", json!({"pattern": "(["}));
        assert_matches!(compile(&def), Err(RuleEvaluationError::InvalidPattern { .. }));
    }

    #[test]
    fn compile_rejects_unknown_type_and_field() {
        assert_matches!(
            compile(&definition("price_between", "", json!({}))),
            Err(RuleEvaluationError::UnknownRuleType(_))
        );
        assert_matches!(
            compile(&definition("price_min", "total_price", json!({"value": 1}))),
            Err(RuleEvaluationError::UnknownField(_))
        );
    }

    #[test]
    fn duplicate_check_defaults_to_target_field() {
        let def = definition("duplicate_check", "item_description", json!({}));
        let compiled = compile(&def).unwrap();
        assert_matches!(compiled.check, Check::Unique(ref f) if f == &vec![TargetField::ItemDescription]);
    }

    #[test]
    fn rule_definition_defaults_enabled() {
        let def: RuleDefinition = serde_json::from_value(json!({
            "name": "n",
            "rule_type": "price_min",
            "severity": "info"
        }))
        .unwrap();
        assert!(def.enabled);
        assert_eq!(def.severity, RuleSeverity::Info);
        assert!(def.field.is_empty());
    }
}
