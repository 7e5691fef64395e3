//! Handlers for project validation rules.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mqt_core::types::DbId;
use mqt_core::validation::{
    default_rule_templates, RuleDefinition, TestRuleOutcome, TestValue, ValidationRule,
};
use mqt_pipeline::{RulePatch, RuleService};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for enabling or disabling a rule.
#[derive(Debug, Deserialize)]
pub struct ToggleRuleRequest {
    pub enabled: bool,
}

/// Request body for a rule dry run.
#[derive(Debug, Deserialize)]
pub struct TestRuleRequest {
    pub rule: RuleDefinition,
    pub test_value: TestValue,
}

/// GET /api/v1/projects/{project_id}/mqt/validation-rules
pub async fn list_rules(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ValidationRule>>>> {
    let rules = state.rules().list_rules(project_id).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// POST /api/v1/projects/{project_id}/mqt/validation-rules
pub async fn create_rule(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<RuleDefinition>,
) -> AppResult<(StatusCode, Json<DataResponse<ValidationRule>>)> {
    let rule = state.rules().create_rule(project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// PUT /api/v1/mqt/validation-rules/{id}
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<RulePatch>,
) -> AppResult<Json<DataResponse<ValidationRule>>> {
    let rule = state.rules().update_rule(id, patch).await?;
    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /api/v1/mqt/validation-rules/{id}
///
/// Returns 204 on success, 404 if not found.
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.rules().delete_rule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/mqt/validation-rules/{id}/toggle
pub async fn toggle_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ToggleRuleRequest>,
) -> AppResult<Json<DataResponse<ValidationRule>>> {
    let rule = state.rules().toggle_rule(id, input.enabled).await?;
    Ok(Json(DataResponse { data: rule }))
}

/// POST /api/v1/mqt/validation-rules/test
///
/// Evaluates a rule against a single value. Nothing is persisted.
pub async fn test_rule(
    Json(input): Json<TestRuleRequest>,
) -> AppResult<Json<DataResponse<TestRuleOutcome>>> {
    let outcome = RuleService::test_rule(&input.rule, &input.test_value)?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/mqt/validation-rules/defaults
pub async fn list_default_rules() -> Json<DataResponse<Vec<RuleDefinition>>> {
    Json(DataResponse {
        data: default_rule_templates(),
    })
}
