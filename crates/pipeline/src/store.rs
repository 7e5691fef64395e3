//! Repository traits the pipeline depends on.
//!
//! Rows are exchanged using the `mqt-db` model types so that the Postgres
//! implementation is a thin delegation and the in-memory one produces
//! identical shapes.

use async_trait::async_trait;
use mqt_core::statistics::MqtStatistics;
use mqt_core::types::DbId;
use mqt_db::models::alert::{CreateMqtAlert, MqtAlert};
use mqt_db::models::import::{CreateMqtImport, MqtImport};
use mqt_db::models::line::{CreateMqtLine, MqtLine};
use mqt_db::models::validation_rule::{
    CreateMqtValidationRule, MqtValidationRuleRow, UpdateMqtValidationRule,
};

use crate::error::StoreError;

#[async_trait]
pub trait ImportRepository: Send + Sync {
    /// Create an import record directly in `processing`.
    async fn create_import(&self, input: &CreateMqtImport) -> Result<MqtImport, StoreError>;

    async fn find_import(&self, id: DbId) -> Result<Option<MqtImport>, StoreError>;

    /// Imports of a project, newest first.
    async fn list_imports(&self, project_id: DbId) -> Result<Vec<MqtImport>, StoreError>;

    /// Move a `processing` import to `completed`. `None` if it was not
    /// processing.
    async fn complete_import(
        &self,
        id: DbId,
        total_rows: i32,
        success_rows: i32,
        failed_rows: i32,
    ) -> Result<Option<MqtImport>, StoreError>;

    /// Move a `processing` import to `failed`.
    async fn fail_import(
        &self,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<MqtImport>, StoreError>;
}

#[async_trait]
pub trait LineRepository: Send + Sync {
    /// Persist one line and its alerts atomically.
    async fn insert_line_with_alerts(
        &self,
        line: &CreateMqtLine,
        alerts: &[CreateMqtAlert],
    ) -> Result<(MqtLine, Vec<MqtAlert>), StoreError>;

    /// Lines of a project in import then source order.
    async fn list_lines(
        &self,
        project_id: DbId,
        import_id: Option<DbId>,
    ) -> Result<Vec<MqtLine>, StoreError>;

    async fn statistics(&self, project_id: DbId) -> Result<MqtStatistics, StoreError>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Alerts of a project, newest first.
    async fn list_alerts(
        &self,
        project_id: DbId,
        is_resolved: Option<bool>,
    ) -> Result<Vec<MqtAlert>, StoreError>;

    /// Resolve an alert; an already resolved alert is returned unchanged.
    async fn resolve_alert(
        &self,
        id: DbId,
        resolved_by: DbId,
    ) -> Result<Option<MqtAlert>, StoreError>;
}

#[async_trait]
pub trait RuleRepository: Send + Sync {
    async fn list_rules(&self, project_id: DbId) -> Result<Vec<MqtValidationRuleRow>, StoreError>;

    async fn find_rule(&self, id: DbId) -> Result<Option<MqtValidationRuleRow>, StoreError>;

    async fn create_rule(
        &self,
        input: &CreateMqtValidationRule,
    ) -> Result<MqtValidationRuleRow, StoreError>;

    async fn update_rule(
        &self,
        id: DbId,
        input: &UpdateMqtValidationRule,
    ) -> Result<Option<MqtValidationRuleRow>, StoreError>;

    async fn set_rule_enabled(
        &self,
        id: DbId,
        enabled: bool,
    ) -> Result<Option<MqtValidationRuleRow>, StoreError>;

    /// Returns `true` if a rule was removed.
    async fn delete_rule(&self, id: DbId) -> Result<bool, StoreError>;
}

/// Everything the pipeline needs from a persistence backend.
pub trait MqtStore: ImportRepository + LineRepository + AlertRepository + RuleRepository {}

impl<T> MqtStore for T where T: ImportRepository + LineRepository + AlertRepository + RuleRepository
{}
