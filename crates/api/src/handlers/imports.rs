//! Handlers for MQT imports.
//!
//! Imports run inside the request: the response carries the full
//! [`ImportResult`] or the error that prevented the import.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use mqt_core::types::DbId;
use mqt_db::models::import::MqtImport;
use mqt_pipeline::ImportResult;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a remote sheet import.
#[derive(Debug, Deserialize)]
pub struct ImportSheetRequest {
    pub sheet_url: String,
    pub imported_by: DbId,
}

/// POST /api/v1/projects/{project_id}/mqt/imports/sheet
pub async fn import_sheet(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<ImportSheetRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ImportResult>>)> {
    let result = state
        .orchestrator()
        .import_from_remote_sheet(project_id, input.imported_by, input.sheet_url.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/// POST /api/v1/projects/{project_id}/mqt/imports/file
///
/// Multipart form with a `file` part (the workbook) and an `imported_by`
/// text part.
pub async fn import_file(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ImportResult>>)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut imported_by: Option<DbId> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload.xlsx").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, data.to_vec()));
            }
            Some("imported_by") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let id = raw.trim().parse::<DbId>().map_err(|_| {
                    AppError::BadRequest(format!("imported_by must be an integer id, got '{raw}'"))
                })?;
                imported_by = Some(id);
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' part".to_string()))?;
    let imported_by = imported_by
        .ok_or_else(|| AppError::BadRequest("Missing 'imported_by' part".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let result = state
        .orchestrator()
        .import_from_file(project_id, imported_by, &file_name, bytes)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/// GET /api/v1/projects/{project_id}/mqt/imports
pub async fn list_imports(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MqtImport>>>> {
    let imports = state.queries().list_imports(project_id).await?;
    Ok(Json(DataResponse { data: imports }))
}

/// GET /api/v1/mqt/imports/{id}
pub async fn get_import(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MqtImport>>> {
    let import = state.queries().get_import(id).await?;
    Ok(Json(DataResponse { data: import }))
}
