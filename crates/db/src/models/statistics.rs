//! Aggregated MQT statistics row.

use mqt_core::statistics::MqtStatistics;
use sqlx::FromRow;

/// Result of the project statistics query.
#[derive(Debug, Clone, FromRow)]
pub struct MqtStatisticsRow {
    pub total_items: i64,
    pub total_planned: f64,
    pub total_executed: f64,
    pub items_on_track: i64,
    pub items_warning: i64,
    pub items_critical: i64,
    pub alerts_total: i64,
    pub alerts_unresolved: i64,
}

impl From<MqtStatisticsRow> for MqtStatistics {
    fn from(row: MqtStatisticsRow) -> Self {
        Self {
            total_items: row.total_items,
            total_planned: row.total_planned,
            total_executed: row.total_executed,
            items_on_track: row.items_on_track,
            items_warning: row.items_warning,
            items_critical: row.items_critical,
            alerts_total: row.alerts_total,
            alerts_unresolved: row.alerts_unresolved,
        }
    }
}
