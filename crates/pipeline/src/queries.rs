//! Read-only reporting over persisted imports, lines and alerts, plus
//! alert resolution.

use std::sync::Arc;

use mqt_core::error::CoreError;
use mqt_core::statistics::MqtStatistics;
use mqt_core::types::DbId;
use mqt_db::models::alert::MqtAlert;
use mqt_db::models::import::MqtImport;
use mqt_db::models::line::MqtLine;

use crate::error::PipelineError;
use crate::store::{AlertRepository, ImportRepository, LineRepository, MqtStore};

#[derive(Clone)]
pub struct MqtQueries {
    store: Arc<dyn MqtStore>,
}

impl MqtQueries {
    pub fn new(store: Arc<dyn MqtStore>) -> Self {
        Self { store }
    }

    pub async fn list_imports(&self, project_id: DbId) -> Result<Vec<MqtImport>, PipelineError> {
        Ok(self.store.list_imports(project_id).await?)
    }

    pub async fn get_import(&self, id: DbId) -> Result<MqtImport, PipelineError> {
        self.store
            .find_import(id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "MqtImport", id }.into())
    }

    pub async fn get_lines(
        &self,
        project_id: DbId,
        import_id: Option<DbId>,
    ) -> Result<Vec<MqtLine>, PipelineError> {
        Ok(self.store.list_lines(project_id, import_id).await?)
    }

    pub async fn get_alerts(
        &self,
        project_id: DbId,
        is_resolved: Option<bool>,
    ) -> Result<Vec<MqtAlert>, PipelineError> {
        Ok(self.store.list_alerts(project_id, is_resolved).await?)
    }

    /// Resolve an alert. Resolving twice is not an error; the first
    /// resolver and time are kept.
    pub async fn resolve_alert(
        &self,
        alert_id: DbId,
        resolved_by: DbId,
    ) -> Result<MqtAlert, PipelineError> {
        let alert = self
            .store
            .resolve_alert(alert_id, resolved_by)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MqtAlert",
                id: alert_id,
            })?;
        tracing::info!(alert_id, resolved_by = ?alert.resolved_by, "MQT alert resolved");
        Ok(alert)
    }

    pub async fn get_statistics(&self, project_id: DbId) -> Result<MqtStatistics, PipelineError> {
        Ok(self.store.statistics(project_id).await?)
    }
}
