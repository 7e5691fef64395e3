//! Aggregate statistics over a project's lines and alerts.

use mqt_core::statistics::MqtStatistics;
use mqt_core::types::DbId;
use sqlx::PgPool;

use crate::models::statistics::MqtStatisticsRow;

pub struct MqtStatisticsRepo;

impl MqtStatisticsRepo {
    /// Compute statistics across every line and alert of a project.
    pub async fn for_project(pool: &PgPool, project_id: DbId) -> Result<MqtStatistics, sqlx::Error> {
        let row = sqlx::query_as::<_, MqtStatisticsRow>(
            "WITH l AS (
                SELECT COUNT(*) AS total_items,
                       COALESCE(SUM(planned_quantity), 0)::DOUBLE PRECISION AS total_planned,
                       COALESCE(SUM(executed_quantity), 0)::DOUBLE PRECISION AS total_executed,
                       COUNT(*) FILTER (WHERE status = 'on_track') AS items_on_track,
                       COUNT(*) FILTER (WHERE status = 'warning') AS items_warning,
                       COUNT(*) FILTER (WHERE status = 'critical') AS items_critical
                FROM mqt_lines WHERE project_id = $1
             ),
             a AS (
                SELECT COUNT(*) AS alerts_total,
                       COUNT(*) FILTER (WHERE NOT is_resolved) AS alerts_unresolved
                FROM mqt_alerts WHERE project_id = $1
             )
             SELECT l.total_items, l.total_planned, l.total_executed,
                    l.items_on_track, l.items_warning, l.items_critical,
                    a.alerts_total, a.alerts_unresolved
             FROM l CROSS JOIN a",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(row.into())
    }
}
