//! Handlers for MQT lines, alerts, statistics and on-demand validation.

use axum::extract::{Path, Query, State};
use axum::Json;
use mqt_core::statistics::MqtStatistics;
use mqt_core::types::DbId;
use mqt_core::validation::BatchEvaluation;
use mqt_db::models::alert::MqtAlert;
use mqt_db::models::line::MqtLine;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::query::{AlertFilterParams, ImportFilterParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for resolving an alert.
#[derive(Debug, Deserialize)]
pub struct ResolveAlertRequest {
    pub resolved_by: DbId,
}

/// On-demand validation outcome.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub evaluation: BatchEvaluation,
    /// Whether any violation has `error` severity.
    pub has_errors: bool,
}

/// GET /api/v1/projects/{project_id}/mqt/lines
pub async fn list_lines(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<ImportFilterParams>,
) -> AppResult<Json<DataResponse<Vec<MqtLine>>>> {
    let lines = state.queries().get_lines(project_id, params.import_id).await?;
    Ok(Json(DataResponse { data: lines }))
}

/// GET /api/v1/projects/{project_id}/mqt/alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<AlertFilterParams>,
) -> AppResult<Json<DataResponse<Vec<MqtAlert>>>> {
    let alerts = state
        .queries()
        .get_alerts(project_id, params.is_resolved)
        .await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/mqt/alerts/{id}/resolve
///
/// Idempotent: resolving an already resolved alert returns it unchanged.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResolveAlertRequest>,
) -> AppResult<Json<DataResponse<MqtAlert>>> {
    let alert = state.queries().resolve_alert(id, input.resolved_by).await?;
    Ok(Json(DataResponse { data: alert }))
}

/// GET /api/v1/projects/{project_id}/mqt/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<MqtStatistics>>> {
    let stats = state.queries().get_statistics(project_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/projects/{project_id}/mqt/validate
pub async fn validate(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<ImportFilterParams>,
) -> AppResult<Json<DataResponse<ValidationReport>>> {
    let evaluation = state
        .rules()
        .validate_lines(project_id, params.import_id)
        .await?;
    let has_errors = evaluation.has_errors();
    Ok(Json(DataResponse {
        data: ValidationReport {
            evaluation,
            has_errors,
        },
    }))
}
