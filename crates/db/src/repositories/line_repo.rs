//! Repository for the `mqt_lines` table and the alerts written with them.

use mqt_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{CreateMqtAlert, MqtAlert};
use crate::models::line::{CreateMqtLine, MqtLine};
use crate::repositories::alert_repo::ALERT_COLUMNS;

/// Column list for mqt_lines queries.
const COLUMNS: &str = "id, import_id, project_id, row_number, item_code, item_description, \
    planned_quantity, executed_quantity, unit, unit_price, category, \
    variance, variance_percentage, status, created_at";

/// Provides persistence for import lines.
pub struct MqtLineRepo;

impl MqtLineRepo {
    /// Insert a line and its alerts in a single transaction.
    ///
    /// Either the line and every alert are written, or nothing is.
    pub async fn create_with_alerts(
        pool: &PgPool,
        line: &CreateMqtLine,
        alerts: &[CreateMqtAlert],
    ) -> Result<(MqtLine, Vec<MqtAlert>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO mqt_lines
                (import_id, project_id, row_number, item_code, item_description,
                 planned_quantity, executed_quantity, unit, unit_price, category,
                 variance, variance_percentage, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, MqtLine>(&query)
            .bind(line.import_id)
            .bind(line.project_id)
            .bind(line.row_number)
            .bind(&line.item_code)
            .bind(&line.item_description)
            .bind(line.planned_quantity)
            .bind(line.executed_quantity)
            .bind(&line.unit)
            .bind(line.unit_price)
            .bind(&line.category)
            .bind(line.variance)
            .bind(line.variance_percentage)
            .bind(&line.status)
            .fetch_one(&mut *tx)
            .await?;

        let alert_query = format!(
            "INSERT INTO mqt_alerts (line_id, project_id, alert_type, severity, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ALERT_COLUMNS}"
        );
        let mut created_alerts = Vec::with_capacity(alerts.len());
        for alert in alerts {
            let row = sqlx::query_as::<_, MqtAlert>(&alert_query)
                .bind(created.id)
                .bind(created.project_id)
                .bind(&alert.alert_type)
                .bind(&alert.severity)
                .bind(&alert.message)
                .fetch_one(&mut *tx)
                .await?;
            created_alerts.push(row);
        }

        tx.commit().await?;
        Ok((created, created_alerts))
    }

    /// List lines for a project, optionally restricted to one import, in
    /// import then source order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        import_id: Option<DbId>,
    ) -> Result<Vec<MqtLine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mqt_lines
             WHERE project_id = $1
               AND ($2::BIGINT IS NULL OR import_id = $2)
             ORDER BY import_id, row_number, id"
        );
        sqlx::query_as::<_, MqtLine>(&query)
            .bind(project_id)
            .bind(import_id)
            .fetch_all(pool)
            .await
    }
}
