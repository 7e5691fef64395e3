//! In-memory store for tests and local experiments.
//!
//! Behaves like [`PgStore`](crate::pg::PgStore) (status guards, first
//! resolution wins, newest-first listings) and supports injecting failures
//! for chosen rows, for rule loading or for completing an import.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use mqt_core::import_status::ImportStatus;
use mqt_core::statistics::MqtStatistics;
use mqt_core::types::DbId;
use mqt_core::variance::LineStatus;
use mqt_db::models::alert::{CreateMqtAlert, MqtAlert};
use mqt_db::models::import::{CreateMqtImport, MqtImport};
use mqt_db::models::line::{CreateMqtLine, MqtLine};
use mqt_db::models::validation_rule::{
    CreateMqtValidationRule, MqtValidationRuleRow, UpdateMqtValidationRule,
};

use crate::error::StoreError;
use crate::store::{AlertRepository, ImportRepository, LineRepository, RuleRepository};

#[derive(Default)]
struct State {
    next_id: DbId,
    imports: Vec<MqtImport>,
    lines: Vec<MqtLine>,
    alerts: Vec<MqtAlert>,
    rules: Vec<MqtValidationRuleRow>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    failing_rows: HashSet<i32>,
    fail_rule_listing: bool,
    fail_completion: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make [`LineRepository::insert_line_with_alerts`] fail for the given
    /// 1-based row numbers.
    pub fn with_failing_rows(mut self, rows: impl IntoIterator<Item = i32>) -> Self {
        self.failing_rows.extend(rows);
        self
    }

    /// Make [`RuleRepository::list_rules`] fail.
    pub fn with_failing_rule_listing(mut self) -> Self {
        self.fail_rule_listing = true;
        self
    }

    /// Make [`ImportRepository::complete_import`] fail.
    pub fn with_failing_completion(mut self) -> Self {
        self.fail_completion = true;
        self
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    /// Move an import to `next` if its current status allows it.
    fn set_import_outcome(
        &self,
        id: DbId,
        next: ImportStatus,
        apply: impl FnOnce(&mut MqtImport),
    ) -> Result<Option<MqtImport>, StoreError> {
        let mut state = self.state()?;
        let Some(import) = state.imports.iter_mut().find(|i| {
            i.id == id
                && ImportStatus::parse(&i.status).is_some_and(|s| s.can_transition_to(next))
        }) else {
            return Ok(None);
        };
        import.status = next.as_str().to_string();
        apply(import);
        import.updated_at = Utc::now();
        Ok(Some(import.clone()))
    }

    fn update_rule_row(
        &self,
        id: DbId,
        apply: impl FnOnce(&mut MqtValidationRuleRow),
    ) -> Result<Option<MqtValidationRuleRow>, StoreError> {
        let mut state = self.state()?;
        let Some(rule) = state.rules.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        apply(rule);
        rule.updated_at = Utc::now();
        Ok(Some(rule.clone()))
    }
}

#[async_trait]
impl ImportRepository for InMemoryStore {
    async fn create_import(&self, input: &CreateMqtImport) -> Result<MqtImport, StoreError> {
        let mut state = self.state()?;
        let now = Utc::now();
        let import = MqtImport {
            id: state.next_id(),
            project_id: input.project_id,
            imported_by: input.imported_by,
            source_kind: input.source_kind.clone(),
            source_locator: input.source_locator.clone(),
            status: ImportStatus::Processing.as_str().to_string(),
            total_rows: 0,
            success_rows: 0,
            failed_rows: 0,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        state.imports.push(import.clone());
        Ok(import)
    }

    async fn find_import(&self, id: DbId) -> Result<Option<MqtImport>, StoreError> {
        Ok(self.state()?.imports.iter().find(|i| i.id == id).cloned())
    }

    async fn list_imports(&self, project_id: DbId) -> Result<Vec<MqtImport>, StoreError> {
        Ok(self
            .state()?
            .imports
            .iter()
            .rev()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn complete_import(
        &self,
        id: DbId,
        total_rows: i32,
        success_rows: i32,
        failed_rows: i32,
    ) -> Result<Option<MqtImport>, StoreError> {
        if self.fail_completion {
            return Err(StoreError::Backend("injected completion failure".to_string()));
        }
        self.set_import_outcome(id, ImportStatus::Completed, |import| {
            import.total_rows = total_rows;
            import.success_rows = success_rows;
            import.failed_rows = failed_rows;
        })
    }

    async fn fail_import(
        &self,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<MqtImport>, StoreError> {
        self.set_import_outcome(id, ImportStatus::Failed, |import| {
            import.error_message = Some(error_message.to_string());
        })
    }
}

#[async_trait]
impl LineRepository for InMemoryStore {
    async fn insert_line_with_alerts(
        &self,
        line: &CreateMqtLine,
        alerts: &[CreateMqtAlert],
    ) -> Result<(MqtLine, Vec<MqtAlert>), StoreError> {
        if self.failing_rows.contains(&line.row_number) {
            return Err(StoreError::Backend(format!(
                "injected failure for row {}",
                line.row_number
            )));
        }

        let mut state = self.state()?;
        let now = Utc::now();
        let created = MqtLine {
            id: state.next_id(),
            import_id: line.import_id,
            project_id: line.project_id,
            row_number: line.row_number,
            item_code: line.item_code.clone(),
            item_description: line.item_description.clone(),
            planned_quantity: line.planned_quantity,
            executed_quantity: line.executed_quantity,
            unit: line.unit.clone(),
            unit_price: line.unit_price,
            category: line.category.clone(),
            variance: line.variance,
            variance_percentage: line.variance_percentage,
            status: line.status.clone(),
            created_at: now,
        };

        let mut created_alerts = Vec::with_capacity(alerts.len());
        for alert in alerts {
            created_alerts.push(MqtAlert {
                id: state.next_id(),
                line_id: created.id,
                project_id: created.project_id,
                alert_type: alert.alert_type.clone(),
                severity: alert.severity.clone(),
                message: alert.message.clone(),
                is_resolved: false,
                resolved_by: None,
                resolved_at: None,
                created_at: now,
            });
        }

        state.lines.push(created.clone());
        state.alerts.extend(created_alerts.iter().cloned());
        Ok((created, created_alerts))
    }

    async fn list_lines(
        &self,
        project_id: DbId,
        import_id: Option<DbId>,
    ) -> Result<Vec<MqtLine>, StoreError> {
        let mut lines: Vec<MqtLine> = self
            .state()?
            .lines
            .iter()
            .filter(|l| l.project_id == project_id)
            .filter(|l| import_id.map_or(true, |id| l.import_id == id))
            .cloned()
            .collect();
        lines.sort_by_key(|l| (l.import_id, l.row_number, l.id));
        Ok(lines)
    }

    async fn statistics(&self, project_id: DbId) -> Result<MqtStatistics, StoreError> {
        let state = self.state()?;
        let mut stats = MqtStatistics::default();
        for line in state.lines.iter().filter(|l| l.project_id == project_id) {
            let status = LineStatus::parse(&line.status).ok_or_else(|| {
                StoreError::Backend(format!("line {} has unknown status", line.id))
            })?;
            stats.add_line(status, line.planned_quantity, line.executed_quantity);
        }
        for alert in state.alerts.iter().filter(|a| a.project_id == project_id) {
            stats.add_alert(alert.is_resolved);
        }
        Ok(stats)
    }
}

#[async_trait]
impl AlertRepository for InMemoryStore {
    async fn list_alerts(
        &self,
        project_id: DbId,
        is_resolved: Option<bool>,
    ) -> Result<Vec<MqtAlert>, StoreError> {
        Ok(self
            .state()?
            .alerts
            .iter()
            .rev()
            .filter(|a| a.project_id == project_id)
            .filter(|a| is_resolved.map_or(true, |r| a.is_resolved == r))
            .cloned()
            .collect())
    }

    async fn resolve_alert(
        &self,
        id: DbId,
        resolved_by: DbId,
    ) -> Result<Option<MqtAlert>, StoreError> {
        let mut state = self.state()?;
        let Some(alert) = state.alerts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if !alert.is_resolved {
            alert.is_resolved = true;
            alert.resolved_by = Some(resolved_by);
            alert.resolved_at = Some(Utc::now());
        }
        Ok(Some(alert.clone()))
    }
}

#[async_trait]
impl RuleRepository for InMemoryStore {
    async fn list_rules(&self, project_id: DbId) -> Result<Vec<MqtValidationRuleRow>, StoreError> {
        if self.fail_rule_listing {
            return Err(StoreError::Backend("injected rule listing failure".to_string()));
        }
        Ok(self
            .state()?
            .rules
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find_rule(&self, id: DbId) -> Result<Option<MqtValidationRuleRow>, StoreError> {
        Ok(self.state()?.rules.iter().find(|r| r.id == id).cloned())
    }

    async fn create_rule(
        &self,
        input: &CreateMqtValidationRule,
    ) -> Result<MqtValidationRuleRow, StoreError> {
        let mut state = self.state()?;
        let now = Utc::now();
        let rule = MqtValidationRuleRow {
            id: state.next_id(),
            project_id: input.project_id,
            name: input.name.clone(),
            rule_type: input.rule_type.clone(),
            field: input.field.clone(),
            condition: input.condition.clone(),
            severity: input.severity.clone(),
            message: input.message.clone(),
            category: input.category.clone(),
            enabled: input.enabled.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.rules.push(rule.clone());
        Ok(rule)
    }

    async fn update_rule(
        &self,
        id: DbId,
        input: &UpdateMqtValidationRule,
    ) -> Result<Option<MqtValidationRuleRow>, StoreError> {
        self.update_rule_row(id, |rule| {
            if let Some(v) = &input.name {
                rule.name = v.clone();
            }
            if let Some(v) = &input.rule_type {
                rule.rule_type = v.clone();
            }
            if let Some(v) = &input.field {
                rule.field = v.clone();
            }
            if let Some(v) = &input.condition {
                rule.condition = v.clone();
            }
            if let Some(v) = &input.severity {
                rule.severity = v.clone();
            }
            if let Some(v) = &input.message {
                rule.message = Some(v.clone());
            }
            if let Some(v) = &input.category {
                rule.category = Some(v.clone());
            }
            if let Some(v) = input.enabled {
                rule.enabled = v;
            }
        })
    }

    async fn set_rule_enabled(
        &self,
        id: DbId,
        enabled: bool,
    ) -> Result<Option<MqtValidationRuleRow>, StoreError> {
        self.update_rule_row(id, |rule| rule.enabled = enabled)
    }

    async fn delete_rule(&self, id: DbId) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        let before = state.rules.len();
        state.rules.retain(|r| r.id != id);
        Ok(state.rules.len() < before)
    }
}
