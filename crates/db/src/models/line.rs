//! MQT line model.

use mqt_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mqt_lines` table. Lines are immutable once written.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MqtLine {
    pub id: DbId,
    pub import_id: DbId,
    pub project_id: DbId,
    /// 1-based position in the source, header excluded.
    pub row_number: i32,
    pub item_code: String,
    pub item_description: String,
    pub planned_quantity: f64,
    pub executed_quantity: f64,
    pub unit: String,
    pub unit_price: Option<f64>,
    pub category: Option<String>,
    pub variance: f64,
    pub variance_percentage: f64,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a classified line.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMqtLine {
    pub import_id: DbId,
    pub project_id: DbId,
    pub row_number: i32,
    pub item_code: String,
    pub item_description: String,
    pub planned_quantity: f64,
    pub executed_quantity: f64,
    pub unit: String,
    pub unit_price: Option<f64>,
    pub category: Option<String>,
    pub variance: f64,
    pub variance_percentage: f64,
    pub status: String,
}
