//! Project-level MQT statistics consumed by dashboards.

use serde::Serialize;

use crate::variance::LineStatus;

/// Aggregate counts over a project's lines and alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MqtStatistics {
    pub total_items: i64,
    pub total_planned: f64,
    pub total_executed: f64,
    pub items_on_track: i64,
    pub items_warning: i64,
    pub items_critical: i64,
    pub alerts_total: i64,
    pub alerts_unresolved: i64,
}

impl MqtStatistics {
    /// Fold one line into the totals.
    pub fn add_line(&mut self, status: LineStatus, planned: f64, executed: f64) {
        self.total_items += 1;
        self.total_planned += planned;
        self.total_executed += executed;
        match status {
            LineStatus::OnTrack => self.items_on_track += 1,
            LineStatus::Warning => self.items_warning += 1,
            LineStatus::Critical => self.items_critical += 1,
        }
    }

    /// Fold one alert into the totals.
    pub fn add_alert(&mut self, is_resolved: bool) {
        self.alerts_total += 1;
        if !is_resolved {
            self.alerts_unresolved += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_lines_and_alerts() {
        let mut stats = MqtStatistics::default();
        stats.add_line(LineStatus::OnTrack, 10.0, 10.0);
        stats.add_line(LineStatus::Warning, 100.0, 112.0);
        stats.add_line(LineStatus::Critical, 50.0, 70.0);
        stats.add_alert(false);
        stats.add_alert(true);

        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_planned, 160.0);
        assert_eq!(stats.total_executed, 192.0);
        assert_eq!(stats.items_on_track, 1);
        assert_eq!(stats.items_warning, 1);
        assert_eq!(stats.items_critical, 1);
        assert_eq!(stats.alerts_total, 2);
        assert_eq!(stats.alerts_unresolved, 1);
    }
}
