//! PostgreSQL store backed by the `mqt-db` repositories.

use async_trait::async_trait;
use mqt_core::statistics::MqtStatistics;
use mqt_core::types::DbId;
use mqt_db::models::alert::{CreateMqtAlert, MqtAlert};
use mqt_db::models::import::{CreateMqtImport, MqtImport};
use mqt_db::models::line::{CreateMqtLine, MqtLine};
use mqt_db::models::validation_rule::{
    CreateMqtValidationRule, MqtValidationRuleRow, UpdateMqtValidationRule,
};
use mqt_db::repositories::{
    MqtAlertRepo, MqtImportRepo, MqtLineRepo, MqtStatisticsRepo, MqtValidationRuleRepo,
};
use sqlx::PgPool;

use crate::error::StoreError;
use crate::store::{AlertRepository, ImportRepository, LineRepository, RuleRepository};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportRepository for PgStore {
    async fn create_import(&self, input: &CreateMqtImport) -> Result<MqtImport, StoreError> {
        Ok(MqtImportRepo::create(&self.pool, input).await?)
    }

    async fn find_import(&self, id: DbId) -> Result<Option<MqtImport>, StoreError> {
        Ok(MqtImportRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_imports(&self, project_id: DbId) -> Result<Vec<MqtImport>, StoreError> {
        Ok(MqtImportRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn complete_import(
        &self,
        id: DbId,
        total_rows: i32,
        success_rows: i32,
        failed_rows: i32,
    ) -> Result<Option<MqtImport>, StoreError> {
        Ok(MqtImportRepo::complete(&self.pool, id, total_rows, success_rows, failed_rows).await?)
    }

    async fn fail_import(
        &self,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<MqtImport>, StoreError> {
        Ok(MqtImportRepo::fail(&self.pool, id, error_message).await?)
    }
}

#[async_trait]
impl LineRepository for PgStore {
    async fn insert_line_with_alerts(
        &self,
        line: &CreateMqtLine,
        alerts: &[CreateMqtAlert],
    ) -> Result<(MqtLine, Vec<MqtAlert>), StoreError> {
        Ok(MqtLineRepo::create_with_alerts(&self.pool, line, alerts).await?)
    }

    async fn list_lines(
        &self,
        project_id: DbId,
        import_id: Option<DbId>,
    ) -> Result<Vec<MqtLine>, StoreError> {
        Ok(MqtLineRepo::list_by_project(&self.pool, project_id, import_id).await?)
    }

    async fn statistics(&self, project_id: DbId) -> Result<MqtStatistics, StoreError> {
        Ok(MqtStatisticsRepo::for_project(&self.pool, project_id).await?)
    }
}

#[async_trait]
impl AlertRepository for PgStore {
    async fn list_alerts(
        &self,
        project_id: DbId,
        is_resolved: Option<bool>,
    ) -> Result<Vec<MqtAlert>, StoreError> {
        Ok(MqtAlertRepo::list_by_project(&self.pool, project_id, is_resolved).await?)
    }

    async fn resolve_alert(
        &self,
        id: DbId,
        resolved_by: DbId,
    ) -> Result<Option<MqtAlert>, StoreError> {
        Ok(MqtAlertRepo::resolve(&self.pool, id, resolved_by).await?)
    }
}

#[async_trait]
impl RuleRepository for PgStore {
    async fn list_rules(&self, project_id: DbId) -> Result<Vec<MqtValidationRuleRow>, StoreError> {
        Ok(MqtValidationRuleRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn find_rule(&self, id: DbId) -> Result<Option<MqtValidationRuleRow>, StoreError> {
        Ok(MqtValidationRuleRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_rule(
        &self,
        input: &CreateMqtValidationRule,
    ) -> Result<MqtValidationRuleRow, StoreError> {
        Ok(MqtValidationRuleRepo::create(&self.pool, input).await?)
    }

    async fn update_rule(
        &self,
        id: DbId,
        input: &UpdateMqtValidationRule,
    ) -> Result<Option<MqtValidationRuleRow>, StoreError> {
        Ok(MqtValidationRuleRepo::update(&self.pool, id, input).await?)
    }

    async fn set_rule_enabled(
        &self,
        id: DbId,
        enabled: bool,
    ) -> Result<Option<MqtValidationRuleRow>, StoreError> {
        Ok(MqtValidationRuleRepo::set_enabled(&self.pool, id, enabled).await?)
    }

    async fn delete_rule(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(MqtValidationRuleRepo::delete(&self.pool, id).await?)
    }
}
