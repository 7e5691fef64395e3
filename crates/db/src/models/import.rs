//! MQT import model.

use mqt_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mqt_imports` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MqtImport {
    pub id: DbId,
    pub project_id: DbId,
    pub imported_by: DbId,
    /// `remote_sheet` or `uploaded_file`.
    pub source_kind: String,
    /// Sheet URL or uploaded file name.
    pub source_locator: String,
    pub status: String,
    pub total_rows: i32,
    pub success_rows: i32,
    pub failed_rows: i32,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new import. The row starts in `processing`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMqtImport {
    pub project_id: DbId,
    pub imported_by: DbId,
    pub source_kind: String,
    pub source_locator: String,
}
