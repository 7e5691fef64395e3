//! Repository for the `mqt_validation_rules` table.

use mqt_core::types::DbId;
use sqlx::PgPool;

use crate::models::validation_rule::{
    CreateMqtValidationRule, MqtValidationRuleRow, UpdateMqtValidationRule,
};

/// Column list for mqt_validation_rules queries.
const COLUMNS: &str = "id, project_id, name, rule_type, field, condition, severity, \
    message, category, enabled, created_at, updated_at";

/// Provides CRUD operations for project validation rules.
pub struct MqtValidationRuleRepo;

impl MqtValidationRuleRepo {
    /// List all rules of a project (enabled or not), oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<MqtValidationRuleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mqt_validation_rules
             WHERE project_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, MqtValidationRuleRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find a rule by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MqtValidationRuleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mqt_validation_rules WHERE id = $1");
        sqlx::query_as::<_, MqtValidationRuleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new rule, returning the inserted row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMqtValidationRule,
    ) -> Result<MqtValidationRuleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO mqt_validation_rules
                (project_id, name, rule_type, field, condition, severity, message, category, enabled)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MqtValidationRuleRow>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.rule_type)
            .bind(&input.field)
            .bind(&input.condition)
            .bind(&input.severity)
            .bind(&input.message)
            .bind(&input.category)
            .bind(input.enabled)
            .fetch_one(pool)
            .await
    }

    /// Update a rule. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMqtValidationRule,
    ) -> Result<Option<MqtValidationRuleRow>, sqlx::Error> {
        let query = format!(
            "UPDATE mqt_validation_rules SET
                name = COALESCE($2, name),
                rule_type = COALESCE($3, rule_type),
                field = COALESCE($4, field),
                condition = COALESCE($5, condition),
                severity = COALESCE($6, severity),
                message = COALESCE($7, message),
                category = COALESCE($8, category),
                enabled = COALESCE($9, enabled)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MqtValidationRuleRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.rule_type)
            .bind(&input.field)
            .bind(&input.condition)
            .bind(&input.severity)
            .bind(&input.message)
            .bind(&input.category)
            .bind(input.enabled)
            .fetch_optional(pool)
            .await
    }

    /// Enable or disable a rule.
    pub async fn set_enabled(
        pool: &PgPool,
        id: DbId,
        enabled: bool,
    ) -> Result<Option<MqtValidationRuleRow>, sqlx::Error> {
        let query = format!(
            "UPDATE mqt_validation_rules SET enabled = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MqtValidationRuleRow>(&query)
            .bind(id)
            .bind(enabled)
            .fetch_optional(pool)
            .await
    }

    /// Delete a rule by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM mqt_validation_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
