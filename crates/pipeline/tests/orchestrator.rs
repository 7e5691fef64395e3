//! End-to-end pipeline tests against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use mqt_core::alert::AlertType;
use mqt_core::error::CoreError;
use mqt_core::import_status::ImportStatus;
use mqt_core::validation::{RuleDefinition, RuleSeverity};
use mqt_db::models::import::{CreateMqtImport, MqtImport};
use mqt_db::models::validation_rule::CreateMqtValidationRule;
use mqt_pipeline::store::{ImportRepository, RuleRepository};
use mqt_pipeline::{
    ImportConfig, ImportOrchestrator, InMemoryStore, MqtQueries, MqtStore, PipelineError,
    RulePatch, RuleService,
};
use mqt_sources::{SheetId, SheetValuesFetcher, SourceError};
use serde_json::json;
use tokio::sync::Notify;

const PROJECT: i64 = 1;
const USER: i64 = 10;
const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/sheet-123/edit";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serves fixed values, or an upstream error when `values` is `None`.
struct FakeFetcher {
    values: Option<Vec<Vec<String>>>,
}

#[async_trait]
impl SheetValuesFetcher for FakeFetcher {
    async fn fetch_values(
        &self,
        _sheet: &SheetId,
        _range: &str,
    ) -> Result<Vec<Vec<String>>, SourceError> {
        self.values.clone().ok_or(SourceError::Upstream {
            status: 503,
            body: "backend unavailable".to_string(),
        })
    }
}

/// Holds every fetch until the gate is opened.
struct GatedFetcher {
    gate: Arc<Notify>,
    values: Vec<Vec<String>>,
}

#[async_trait]
impl SheetValuesFetcher for GatedFetcher {
    async fn fetch_values(
        &self,
        _sheet: &SheetId,
        _range: &str,
    ) -> Result<Vec<Vec<String>>, SourceError> {
        self.gate.notified().await;
        Ok(self.values.clone())
    }
}

/// Poll until the project's only import leaves `processing`.
async fn wait_until_finished(queries: &MqtQueries) -> MqtImport {
    for _ in 0..200 {
        let imports = queries.list_imports(PROJECT).await.unwrap();
        if let Some(import) = imports.into_iter().find(|i| i.status != "processing") {
            return import;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("import never left processing");
}

fn sheet(rows: &[[&str; 5]]) -> Vec<Vec<String>> {
    let header = ["Code", "Description", "Planned", "Executed", "Unit"];
    std::iter::once(&header)
        .chain(rows.iter())
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn ten_rows() -> Vec<Vec<String>> {
    let rows: Vec<[String; 5]> = (1..=10)
        .map(|i| {
            [
                format!("C{i}"),
                format!("Item {i}"),
                "100".to_string(),
                // Every third row is critical.
                if i % 3 == 0 { "130" } else { "100" }.to_string(),
                "m".to_string(),
            ]
        })
        .collect();
    let borrowed: Vec<[&str; 5]> = rows
        .iter()
        .map(|r| [r[0].as_str(), r[1].as_str(), r[2].as_str(), r[3].as_str(), r[4].as_str()])
        .collect();
    sheet(&borrowed)
}

fn two_rows() -> Vec<Vec<String>> {
    sheet(&[
        ["A", "Concrete", "100", "120", "m3"],
        ["B", "Rebar", "50", "50", "kg"],
    ])
}

struct Harness {
    store: Arc<InMemoryStore>,
    orchestrator: ImportOrchestrator,
    queries: MqtQueries,
    rules: RuleService,
}

fn harness(store: InMemoryStore, values: Option<Vec<Vec<String>>>) -> Harness {
    let store = Arc::new(store);
    let dyn_store: Arc<dyn MqtStore> = store.clone();
    Harness {
        orchestrator: ImportOrchestrator::new(
            Arc::clone(&dyn_store),
            Arc::new(FakeFetcher { values }),
            ImportConfig::default(),
        ),
        queries: MqtQueries::new(Arc::clone(&dyn_store)),
        rules: RuleService::new(dyn_store),
        store,
    }
}

fn rule(rule_type: &str, condition: serde_json::Value) -> RuleDefinition {
    RuleDefinition {
        name: format!("{rule_type} rule"),
        rule_type: rule_type.to_string(),
        field: String::new(),
        condition,
        severity: RuleSeverity::Warning,
        message: None,
        category: None,
        enabled: true,
    }
}

// ---------------------------------------------------------------------------
// Remote sheet imports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn row_failure_is_counted_and_import_completes() {
    let h = harness(InMemoryStore::new().with_failing_rows([5]), Some(ten_rows()));

    let result = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();

    assert_eq!(result.status, ImportStatus::Completed);
    assert_eq!(result.total_rows, 10);
    assert_eq!(result.success_rows, 9);
    assert_eq!(result.failed_rows, 1);
    assert_eq!(result.row_errors.len(), 1);
    assert_eq!(result.row_errors[0].row_number, 5);
    assert_eq!(result.row_errors[0].item_code, "C5");

    let import = h.queries.get_import(result.import_id).await.unwrap();
    assert_eq!(import.status, "completed");
    assert_eq!((import.total_rows, import.success_rows, import.failed_rows), (10, 9, 1));

    let lines = h.queries.get_lines(PROJECT, Some(result.import_id)).await.unwrap();
    assert_eq!(lines.len(), 9);
    assert!(lines.iter().all(|l| l.row_number != 5));
}

#[tokio::test]
async fn alerts_are_raised_for_out_of_tolerance_rows() {
    let h = harness(InMemoryStore::new(), Some(ten_rows()));

    let result = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();

    // Rows 3, 6 and 9 are 30% over plan.
    let codes: Vec<&str> = result.alerts.iter().map(|a| a.item_code.as_str()).collect();
    assert_eq!(codes, vec!["C3", "C6", "C9"]);
    assert!(result
        .alerts
        .iter()
        .all(|a| a.alert_type == AlertType::VarianceCritical));
    assert_eq!(
        result.alerts[0].message,
        "Critical variance detected: 30.00% for item C3"
    );

    let stored = h.queries.get_alerts(PROJECT, Some(false)).await.unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn invalid_locator_creates_no_import() {
    let h = harness(InMemoryStore::new(), Some(two_rows()));

    let err = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, "https://example.com/not-a-sheet")
        .await
        .unwrap_err();

    assert_matches!(err, PipelineError::Source(SourceError::InvalidLocator(_)));
    assert!(h.queries.list_imports(PROJECT).await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_marks_import_failed() {
    let h = harness(InMemoryStore::new(), None);

    let err = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap_err();
    assert_matches!(err, PipelineError::Source(SourceError::Upstream { status: 503, .. }));

    let imports = h.queries.list_imports(PROJECT).await.unwrap();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].status, "failed");
    assert!(imports[0]
        .error_message
        .as_deref()
        .unwrap_or_default()
        .contains("503"));
}

#[tokio::test]
async fn header_only_sheet_marks_import_failed() {
    let h = harness(InMemoryStore::new(), Some(sheet(&[])));

    let err = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap_err();
    assert_matches!(err, PipelineError::Source(SourceError::EmptyDocument));
    assert_eq!(h.queries.list_imports(PROJECT).await.unwrap()[0].status, "failed");
}

#[tokio::test]
async fn importing_twice_creates_independent_imports() {
    let h = harness(InMemoryStore::new(), Some(two_rows()));

    let first = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();
    let second = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();
    assert_ne!(first.import_id, second.import_id);

    for id in [first.import_id, second.import_id] {
        assert_eq!(h.queries.get_lines(PROJECT, Some(id)).await.unwrap().len(), 2);
    }

    // Row A is critical in both imports; resolve only the first one's alert.
    let alerts = h.queries.get_alerts(PROJECT, None).await.unwrap();
    assert_eq!(alerts.len(), 2);
    let first_lines = h.queries.get_lines(PROJECT, Some(first.import_id)).await.unwrap();
    let first_alert = alerts
        .iter()
        .find(|a| first_lines.iter().any(|l| l.id == a.line_id))
        .unwrap();
    h.queries.resolve_alert(first_alert.id, USER).await.unwrap();

    let unresolved = h.queries.get_alerts(PROJECT, Some(false)).await.unwrap();
    assert_eq!(unresolved.len(), 1);
    assert_ne!(unresolved[0].id, first_alert.id);
}

#[tokio::test]
async fn completion_failure_marks_import_failed() {
    let h = harness(InMemoryStore::new().with_failing_completion(), Some(two_rows()));

    let err = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap_err();
    assert_matches!(err, PipelineError::Store(_));

    let imports = h.queries.list_imports(PROJECT).await.unwrap();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].status, "failed");
    assert!(imports[0]
        .error_message
        .as_deref()
        .unwrap_or_default()
        .contains("injected completion failure"));
}

#[tokio::test]
async fn import_finishes_after_caller_stops_waiting() {
    let store: Arc<dyn MqtStore> = Arc::new(InMemoryStore::new());
    let gate = Arc::new(Notify::new());
    let orchestrator = ImportOrchestrator::new(
        Arc::clone(&store),
        Arc::new(GatedFetcher {
            gate: Arc::clone(&gate),
            values: two_rows(),
        }),
        ImportConfig::default(),
    );
    let queries = MqtQueries::new(store);

    // The caller gives up while the fetch is still pending.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        orchestrator.import_from_remote_sheet(PROJECT, USER, SHEET_URL),
    )
    .await;
    assert!(abandoned.is_err());
    drop(orchestrator);

    let imports = queries.list_imports(PROJECT).await.unwrap();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].status, "processing");

    gate.notify_one();

    let import = wait_until_finished(&queries).await;
    assert_eq!(import.status, "completed");
    assert_eq!((import.total_rows, import.success_rows), (2, 2));
    let lines = queries.get_lines(PROJECT, Some(import.id)).await.unwrap();
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn finished_import_cannot_change_status() {
    let store = InMemoryStore::new();
    let import = store
        .create_import(&CreateMqtImport {
            project_id: PROJECT,
            imported_by: USER,
            source_kind: "remote_sheet".to_string(),
            source_locator: SHEET_URL.to_string(),
        })
        .await
        .unwrap();

    let failed = store.fail_import(import.id, "boom").await.unwrap().unwrap();
    assert_eq!(failed.status, "failed");

    assert!(store.complete_import(import.id, 1, 1, 0).await.unwrap().is_none());
    assert!(store.fail_import(import.id, "again").await.unwrap().is_none());

    let stored = store.find_import(import.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "failed");
    assert_eq!(stored.error_message.as_deref(), Some("boom"));
}

// ---------------------------------------------------------------------------
// Alerts and statistics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolving_twice_keeps_first_resolution() {
    let h = harness(InMemoryStore::new(), Some(two_rows()));
    h.orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();
    let alert_id = h.queries.get_alerts(PROJECT, None).await.unwrap()[0].id;

    let first = h.queries.resolve_alert(alert_id, 1).await.unwrap();
    let second = h.queries.resolve_alert(alert_id, 2).await.unwrap();

    assert!(second.is_resolved);
    assert_eq!(second.resolved_by, Some(1));
    assert_eq!(second.resolved_at, first.resolved_at);
}

#[tokio::test]
async fn resolving_unknown_alert_is_not_found() {
    let h = harness(InMemoryStore::new(), None);
    let err = h.queries.resolve_alert(404, USER).await.unwrap_err();
    assert_matches!(err, PipelineError::Core(CoreError::NotFound { entity: "MqtAlert", id: 404 }));
}

#[tokio::test]
async fn statistics_reflect_imported_lines() {
    let h = harness(InMemoryStore::new(), Some(two_rows()));
    h.orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();

    let stats = h.queries.get_statistics(PROJECT).await.unwrap();
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.total_planned, 150.0);
    assert_eq!(stats.total_executed, 170.0);
    assert_eq!(stats.items_critical, 1);
    assert_eq!(stats.items_on_track, 1);
    assert_eq!(stats.alerts_total, 1);
    assert_eq!(stats.alerts_unresolved, 1);

    let other_project = h.queries.get_statistics(PROJECT + 1).await.unwrap();
    assert_eq!(other_project.total_items, 0);
}

// ---------------------------------------------------------------------------
// Uploaded workbooks
// ---------------------------------------------------------------------------

fn workbook_bytes() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["Item Code", "Description", "Planned Qty", "Executed Qty", "Unit"];
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *h).unwrap();
    }
    let rows = [("1.01", 100.0, 112.0), ("1.02", 40.0, 40.0), ("1.01", 10.0, 10.0)];
    for (i, (code, planned, executed)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, *code).unwrap();
        sheet.write_string(r, 1, "Work").unwrap();
        sheet.write_number(r, 2, *planned).unwrap();
        sheet.write_number(r, 3, *executed).unwrap();
        sheet.write_string(r, 4, "m2").unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn file_import_classifies_and_validates() {
    let h = harness(InMemoryStore::new(), None);
    h.rules
        .create_rule(PROJECT, &rule("duplicate_check", json!({})))
        .await
        .unwrap();
    let mut disabled = rule("quantity_min", json!({"value": 1000}));
    disabled.enabled = false;
    h.rules.create_rule(PROJECT, &disabled).await.unwrap();

    let result = h
        .orchestrator
        .import_from_file(PROJECT, USER, "mqt.xlsx", workbook_bytes())
        .await
        .unwrap();

    assert_eq!(result.total_rows, 3);
    assert_eq!(result.success_rows, 3);
    assert_eq!(result.alerts.len(), 1);
    assert_eq!(result.alerts[0].alert_type, AlertType::VarianceHigh);

    let flagged: Vec<usize> = result.rule_violations.iter().map(|v| v.line_index).collect();
    assert_eq!(flagged, vec![0, 2]);
    assert!(result
        .rule_violations
        .iter()
        .all(|v| v.rule_type == "duplicate_check"));

    let import = h.queries.get_import(result.import_id).await.unwrap();
    assert_eq!(import.source_kind, "uploaded_file");
    assert_eq!(import.source_locator, "mqt.xlsx");
}

#[tokio::test]
async fn unreadable_workbook_marks_import_failed() {
    let h = harness(InMemoryStore::new(), None);
    let err = h
        .orchestrator
        .import_from_file(PROJECT, USER, "notes.txt", b"plain text".to_vec())
        .await
        .unwrap_err();
    assert_matches!(err, PipelineError::Source(SourceError::Workbook(_)));
    assert_eq!(h.queries.list_imports(PROJECT).await.unwrap()[0].status, "failed");
}

#[tokio::test]
async fn rule_loading_failure_does_not_fail_import() {
    let h = harness(InMemoryStore::new().with_failing_rule_listing(), Some(two_rows()));
    let result = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();
    assert_eq!(result.status, ImportStatus::Completed);
    assert!(result.rule_violations.is_empty());
}

#[tokio::test]
async fn malformed_stored_rule_is_skipped_during_import() {
    let h = harness(InMemoryStore::new(), Some(two_rows()));
    // Written around the service to simulate a rule edited directly in the store.
    h.store
        .create_rule(&CreateMqtValidationRule {
            project_id: PROJECT,
            name: "Broken".to_string(),
            rule_type: "code_pattern".to_string(),
            field: String::new(),
            condition: json!({"pattern": "(["}),
            severity: "error".to_string(),
            message: None,
            category: None,
            enabled: Some(true),
        })
        .await
        .unwrap();
    h.rules
        .create_rule(PROJECT, &rule("quantity_max", json!({"value": 60})))
        .await
        .unwrap();

    let result = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();

    assert_eq!(result.skipped_rules.len(), 1);
    assert_eq!(result.skipped_rules[0].rule_name, "Broken");
    assert_eq!(result.rule_violations.len(), 1);
    assert_eq!(result.rule_violations[0].item_code, "A");
}

// ---------------------------------------------------------------------------
// Rule management
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rule_rejects_invalid_definition() {
    let h = harness(InMemoryStore::new(), None);
    let err = h
        .rules
        .create_rule(PROJECT, &rule("code_pattern", json!({"pattern": "(["})))
        .await
        .unwrap_err();
    assert_matches!(err, PipelineError::Core(CoreError::Validation(_)));
    assert!(h.rules.list_rules(PROJECT).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_toggle_and_delete_rule() {
    let h = harness(InMemoryStore::new(), None);
    let created = h
        .rules
        .create_rule(PROJECT, &rule("price_min", json!({"value": 1})))
        .await
        .unwrap();

    let updated = h
        .rules
        .update_rule(
            created.id,
            RulePatch {
                condition: Some(json!({"value": 5})),
                message: Some("Price too low".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.definition.condition, json!({"value": 5}));
    assert_eq!(updated.definition.message.as_deref(), Some("Price too low"));

    let bad = h
        .rules
        .update_rule(
            created.id,
            RulePatch {
                condition: Some(json!({"pattern": "x"})),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(bad, PipelineError::Core(CoreError::Validation(_)));

    let toggled = h.rules.toggle_rule(created.id, false).await.unwrap();
    assert!(!toggled.definition.enabled);

    h.rules.delete_rule(created.id).await.unwrap();
    assert_matches!(
        h.rules.delete_rule(created.id).await,
        Err(PipelineError::Core(CoreError::NotFound { .. }))
    );
    assert_matches!(
        h.rules.toggle_rule(created.id, true).await,
        Err(PipelineError::Core(CoreError::NotFound { .. }))
    );
}

#[tokio::test]
async fn validate_lines_runs_on_stored_lines() {
    let h = harness(InMemoryStore::new(), Some(two_rows()));
    let first = h
        .orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();
    h.orchestrator
        .import_from_remote_sheet(PROJECT, USER, SHEET_URL)
        .await
        .unwrap();
    h.rules
        .create_rule(PROJECT, &rule("duplicate_check", json!({})))
        .await
        .unwrap();

    // Across both imports every code appears twice.
    let all = h.rules.validate_lines(PROJECT, None).await.unwrap();
    assert_eq!(all.violations.len(), 4);

    let one = h.rules.validate_lines(PROJECT, Some(first.import_id)).await.unwrap();
    assert!(one.violations.is_empty());
    assert_eq!(one.rules_evaluated, 1);
}
