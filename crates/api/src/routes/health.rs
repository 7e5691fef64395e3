use std::time::Instant;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database is reachable and migrated, else `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub imports: ImportSettings,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    /// Round trip of the ping, when it succeeded.
    pub latency_ms: Option<u64>,
    /// Whether every MQT table exists.
    pub mqt_tables: bool,
}

/// Import settings in effect, so operators can confirm the deployed config.
#[derive(Serialize)]
pub struct ImportSettings {
    pub sheet_range: String,
    pub validate_on_import: bool,
    pub max_upload_bytes: usize,
}

/// GET /health -- database reachability, MQT schema and import settings.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let started = Instant::now();
    let reachable = mqt_db::health_check(&state.pool).await.is_ok();
    let latency_ms = reachable.then(|| started.elapsed().as_millis() as u64);

    let mqt_tables = if reachable {
        match mqt_db::mqt_tables_present(&state.pool).await {
            Ok(present) => present,
            Err(err) => {
                tracing::warn!(error = %err, "Could not inspect MQT tables");
                false
            }
        }
    } else {
        false
    };

    let status = if reachable && mqt_tables { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth {
            reachable,
            latency_ms,
            mqt_tables,
        },
        imports: ImportSettings {
            sheet_range: state.config.sheet_range.clone(),
            validate_on_import: state.config.validate_on_import,
            max_upload_bytes: state.config.max_upload_bytes,
        },
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
