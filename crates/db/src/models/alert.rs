//! MQT alert model.

use mqt_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mqt_alerts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MqtAlert {
    pub id: DbId,
    pub line_id: DbId,
    pub project_id: DbId,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub is_resolved: bool,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for an alert written alongside its line. The owning line and project
/// are taken from the line being inserted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMqtAlert {
    pub alert_type: String,
    pub severity: String,
    pub message: String,
}
