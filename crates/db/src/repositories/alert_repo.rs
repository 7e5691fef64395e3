//! Repository for the `mqt_alerts` table.

use mqt_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::MqtAlert;

/// Column list for mqt_alerts queries.
pub(crate) const ALERT_COLUMNS: &str = "id, line_id, project_id, alert_type, severity, message, \
    is_resolved, resolved_by, resolved_at, created_at";

/// Provides read and resolve operations for alerts. Alerts are created by
/// [`MqtLineRepo::create_with_alerts`](crate::repositories::MqtLineRepo::create_with_alerts).
pub struct MqtAlertRepo;

impl MqtAlertRepo {
    /// Find an alert by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MqtAlert>, sqlx::Error> {
        let query = format!("SELECT {ALERT_COLUMNS} FROM mqt_alerts WHERE id = $1");
        sqlx::query_as::<_, MqtAlert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List alerts for a project, newest first, optionally filtered by
    /// resolution state.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        is_resolved: Option<bool>,
    ) -> Result<Vec<MqtAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {ALERT_COLUMNS} FROM mqt_alerts
             WHERE project_id = $1
               AND ($2::BOOLEAN IS NULL OR is_resolved = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, MqtAlert>(&query)
            .bind(project_id)
            .bind(is_resolved)
            .fetch_all(pool)
            .await
    }

    /// Resolve an alert. The first resolution wins: resolving an already
    /// resolved alert returns it unchanged.
    ///
    /// Returns `None` if no alert with the given `id` exists.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        resolved_by: DbId,
    ) -> Result<Option<MqtAlert>, sqlx::Error> {
        let query = format!(
            "UPDATE mqt_alerts SET
                is_resolved = true,
                resolved_by = $2,
                resolved_at = NOW()
             WHERE id = $1 AND is_resolved = false
             RETURNING {ALERT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, MqtAlert>(&query)
            .bind(id)
            .bind(resolved_by)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(alert) => Ok(Some(alert)),
            None => Self::find_by_id(pool, id).await,
        }
    }
}
