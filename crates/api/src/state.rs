use std::sync::Arc;

use mqt_pipeline::{ImportConfig, ImportOrchestrator, MqtQueries, MqtStore, RuleService};
use mqt_sources::SheetValuesFetcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used for health checks.
    pub pool: mqt_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Persistence backend for the pipeline services.
    pub store: Arc<dyn MqtStore>,
    /// Spreadsheet service client.
    pub fetcher: Arc<dyn SheetValuesFetcher>,
}

impl AppState {
    pub fn orchestrator(&self) -> ImportOrchestrator {
        ImportOrchestrator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.fetcher),
            ImportConfig {
                sheet_range: self.config.sheet_range.clone(),
                validate_on_import: self.config.validate_on_import,
            },
        )
    }

    pub fn queries(&self) -> MqtQueries {
        MqtQueries::new(Arc::clone(&self.store))
    }

    pub fn rules(&self) -> RuleService {
        RuleService::new(Arc::clone(&self.store))
    }
}
