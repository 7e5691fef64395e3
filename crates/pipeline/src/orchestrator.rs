//! Import orchestrator: the only component with side effects during import.
//!
//! An import moves through `processing -> completed | failed`. The record is
//! created once the source locator has been accepted; rows are then
//! classified, alerted and persisted one at a time, so a failing row is
//! counted and logged without aborting the batch. A failure of the source
//! itself marks the import `failed` and is returned to the caller.
//!
//! Each import runs on its own task, so an import that has started always
//! ends `completed` or `failed` even if the caller goes away.

use std::sync::Arc;

use mqt_core::alert::{alerts_for, AlertSeverity, AlertType};
use mqt_core::canonical::CanonicalRow;
use mqt_core::error::CoreError;
use mqt_core::import_status::{ImportStatus, SourceKind};
use mqt_core::types::DbId;
use mqt_core::validation::{evaluate_batch, LineFacts, RuleViolation, SkippedRule};
use mqt_db::models::alert::CreateMqtAlert;
use mqt_db::models::import::{CreateMqtImport, MqtImport};
use mqt_db::models::line::CreateMqtLine;
use mqt_sources::remote_sheet::DEFAULT_SHEET_RANGE;
use mqt_sources::{RemoteSheetAdapter, SheetId, SheetValuesFetcher, SourceError, WorkbookAdapter};
use serde::Serialize;

use crate::error::PipelineError;
use crate::rules::{load_rules, log_skipped_rules};
use crate::store::{ImportRepository, LineRepository, MqtStore};

/// Tunables for an [`ImportOrchestrator`].
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Range fetched from remote sheets.
    pub sheet_range: String,
    /// Evaluate the project's rules against every import.
    pub validate_on_import: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            sheet_range: DEFAULT_SHEET_RANGE.to_string(),
            validate_on_import: true,
        }
    }
}

/// An alert raised while importing, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportAlert {
    pub item_code: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
}

/// A row that could not be persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// 1-based position in the source, header excluded.
    pub row_number: i32,
    pub item_code: String,
    pub message: String,
}

/// Summary of a finished import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub import_id: DbId,
    pub status: ImportStatus,
    pub total_rows: i32,
    pub success_rows: i32,
    pub failed_rows: i32,
    pub alerts: Vec<ImportAlert>,
    pub row_errors: Vec<RowError>,
    /// Violations of the project's rules; `line_index` is the 0-based row
    /// position in the source.
    pub rule_violations: Vec<RuleViolation>,
    pub skipped_rules: Vec<SkippedRule>,
}

/// Where the rows of an import are read from.
enum ImportSource {
    RemoteSheet { sheet: SheetId, locator: String },
    UploadedFile { file_name: String, bytes: Vec<u8> },
}

impl ImportSource {
    fn kind(&self) -> SourceKind {
        match self {
            Self::RemoteSheet { .. } => SourceKind::RemoteSheet,
            Self::UploadedFile { .. } => SourceKind::UploadedFile,
        }
    }

    fn locator(&self) -> &str {
        match self {
            Self::RemoteSheet { locator, .. } => locator,
            Self::UploadedFile { file_name, .. } => file_name,
        }
    }
}

#[derive(Clone)]
pub struct ImportOrchestrator {
    store: Arc<dyn MqtStore>,
    fetcher: Arc<dyn SheetValuesFetcher>,
    config: ImportConfig,
}

impl ImportOrchestrator {
    pub fn new(
        store: Arc<dyn MqtStore>,
        fetcher: Arc<dyn SheetValuesFetcher>,
        config: ImportConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    /// Import a document from the spreadsheet service.
    ///
    /// A URL without a document id is rejected before any import record is
    /// created.
    pub async fn import_from_remote_sheet(
        &self,
        project_id: DbId,
        imported_by: DbId,
        sheet_url: &str,
    ) -> Result<ImportResult, PipelineError> {
        let sheet = SheetId::parse(sheet_url)?;
        let source = ImportSource::RemoteSheet {
            sheet,
            locator: sheet_url.to_string(),
        };
        self.run_detached(project_id, imported_by, source).await
    }

    /// Import an uploaded workbook.
    pub async fn import_from_file(
        &self,
        project_id: DbId,
        imported_by: DbId,
        file_name: &str,
        file_bytes: Vec<u8>,
    ) -> Result<ImportResult, PipelineError> {
        let source = ImportSource::UploadedFile {
            file_name: file_name.to_string(),
            bytes: file_bytes,
        };
        self.run_detached(project_id, imported_by, source).await
    }

    /// Run the import on its own task and wait for it.
    ///
    /// Dropping the returned future (request timeout, client disconnect)
    /// detaches the task, which still drives the import to `completed` or
    /// `failed`.
    async fn run_detached(
        &self,
        project_id: DbId,
        imported_by: DbId,
        source: ImportSource,
    ) -> Result<ImportResult, PipelineError> {
        let task = tokio::spawn(self.clone().run(project_id, imported_by, source));
        task.await.map_err(|e| {
            PipelineError::from(CoreError::Internal(format!("import task failed: {e}")))
        })?
    }

    async fn run(
        self,
        project_id: DbId,
        imported_by: DbId,
        source: ImportSource,
    ) -> Result<ImportResult, PipelineError> {
        let import = self
            .start(project_id, imported_by, source.kind(), source.locator())
            .await?;
        let import_id = import.id;

        // A panic while ingesting must still leave the record terminal.
        let worker = self.clone();
        match tokio::spawn(async move { worker.ingest(import, source).await }).await {
            Ok(result) => result,
            Err(e) => {
                let err: PipelineError =
                    CoreError::Internal(format!("import task failed: {e}")).into();
                Err(self.fail(import_id, err).await)
            }
        }
    }

    async fn ingest(
        &self,
        import: MqtImport,
        source: ImportSource,
    ) -> Result<ImportResult, PipelineError> {
        match self.read_rows(source).await {
            Ok(rows) => self.process(import, rows).await,
            Err(err) => Err(self.fail(import.id, err).await),
        }
    }

    async fn read_rows(&self, source: ImportSource) -> Result<Vec<CanonicalRow>, PipelineError> {
        match source {
            ImportSource::RemoteSheet { sheet, .. } => {
                let adapter = RemoteSheetAdapter::new(
                    Arc::clone(&self.fetcher),
                    self.config.sheet_range.clone(),
                );
                Ok(adapter.parse(&sheet).await?)
            }
            ImportSource::UploadedFile { bytes, .. } => {
                tokio::task::spawn_blocking(move || WorkbookAdapter.parse(&bytes))
                    .await
                    .map_err(|e| {
                        PipelineError::from(CoreError::Internal(format!(
                            "workbook parsing task failed: {e}"
                        )))
                    })?
                    .map_err(PipelineError::from)
            }
        }
    }

    async fn start(
        &self,
        project_id: DbId,
        imported_by: DbId,
        source_kind: SourceKind,
        source_locator: &str,
    ) -> Result<MqtImport, PipelineError> {
        let import = self
            .store
            .create_import(&CreateMqtImport {
                project_id,
                imported_by,
                source_kind: source_kind.as_str().to_string(),
                source_locator: source_locator.to_string(),
            })
            .await?;
        tracing::info!(
            import_id = import.id,
            project_id,
            source_kind = source_kind.as_str(),
            "MQT import started"
        );
        Ok(import)
    }

    /// Mark the import failed and hand the cause back to the caller.
    async fn fail(&self, import_id: DbId, err: PipelineError) -> PipelineError {
        match &err {
            PipelineError::Source(source) if source.is_client_error() => {
                tracing::warn!(import_id, error = %err, "MQT import rejected");
            }
            _ => tracing::error!(import_id, error = %err, "MQT import failed"),
        }
        if let Err(store_err) = self.store.fail_import(import_id, &err.to_string()).await {
            tracing::error!(
                import_id,
                error = %store_err,
                "Failed to mark MQT import as failed"
            );
        }
        err
    }

    async fn process(
        &self,
        import: MqtImport,
        rows: Vec<CanonicalRow>,
    ) -> Result<ImportResult, PipelineError> {
        if rows.is_empty() {
            return Err(self.fail(import.id, SourceError::EmptyDocument.into()).await);
        }

        let mut alerts = Vec::new();
        let mut row_errors = Vec::new();
        let mut success_rows = 0;
        let mut failed_rows = 0;

        for (index, row) in rows.iter().enumerate() {
            let row_number = index as i32 + 1;
            let outcome = row.variance();
            let generated = alerts_for(&row.item_code, outcome.variance_percentage, outcome.status);

            let line = CreateMqtLine {
                import_id: import.id,
                project_id: import.project_id,
                row_number,
                item_code: row.item_code.clone(),
                item_description: row.item_description.clone(),
                planned_quantity: row.planned_quantity,
                executed_quantity: row.executed_quantity,
                unit: row.unit.clone(),
                unit_price: row.unit_price,
                category: row.category.clone(),
                variance: outcome.variance,
                variance_percentage: outcome.variance_percentage,
                status: outcome.status.as_str().to_string(),
            };
            let alert_inputs: Vec<CreateMqtAlert> = generated
                .iter()
                .map(|a| CreateMqtAlert {
                    alert_type: a.alert_type.as_str().to_string(),
                    severity: a.severity.as_str().to_string(),
                    message: a.message.clone(),
                })
                .collect();

            match self.store.insert_line_with_alerts(&line, &alert_inputs).await {
                Ok(_) => {
                    success_rows += 1;
                    alerts.extend(generated.into_iter().map(|a| ImportAlert {
                        item_code: row.item_code.clone(),
                        alert_type: a.alert_type,
                        severity: a.severity,
                        message: a.message,
                    }));
                }
                Err(err) => {
                    failed_rows += 1;
                    tracing::warn!(
                        import_id = import.id,
                        row = row_number,
                        item_code = %row.item_code,
                        error = %err,
                        "Failed to persist MQT row"
                    );
                    row_errors.push(RowError {
                        row_number,
                        item_code: row.item_code.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let (rule_violations, skipped_rules) = if self.config.validate_on_import {
            self.validate_rows(import.project_id, &rows).await
        } else {
            (Vec::new(), Vec::new())
        };

        let total_rows = rows.len() as i32;
        let finished = match self
            .store
            .complete_import(import.id, total_rows, success_rows, failed_rows)
            .await
        {
            Ok(Some(finished)) => finished,
            Ok(None) => {
                return Err(CoreError::Conflict(format!(
                    "import {} is no longer processing",
                    import.id
                ))
                .into())
            }
            Err(err) => return Err(self.fail(import.id, err.into()).await),
        };

        tracing::info!(
            import_id = import.id,
            total_rows,
            success_rows,
            failed_rows,
            alerts = alerts.len(),
            rule_violations = rule_violations.len(),
            "MQT import completed"
        );

        Ok(ImportResult {
            import_id: finished.id,
            status: ImportStatus::Completed,
            total_rows,
            success_rows,
            failed_rows,
            alerts,
            row_errors,
            rule_violations,
            skipped_rules,
        })
    }

    /// Evaluate the project's rules against the imported batch. Failing to
    /// load the rules is logged and yields no violations.
    async fn validate_rows(
        &self,
        project_id: DbId,
        rows: &[CanonicalRow],
    ) -> (Vec<RuleViolation>, Vec<SkippedRule>) {
        let rules = match load_rules(self.store.as_ref(), project_id).await {
            Ok(rules) => rules,
            Err(err) => {
                tracing::warn!(project_id, error = %err, "Could not load validation rules");
                return (Vec::new(), Vec::new());
            }
        };

        let facts: Vec<LineFacts> = rows.iter().map(LineFacts::from).collect();
        let evaluation = evaluate_batch(&rules, &facts);
        log_skipped_rules(&evaluation.skipped_rules);
        (evaluation.violations, evaluation.skipped_rules)
    }
}
