use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mqt_core::error::CoreError;
use mqt_pipeline::{PipelineError, StoreError};
use mqt_sources::SourceError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain and pipeline errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mqt_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the import pipeline, its sources or its store.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type ErrorParts = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Pipeline(PipelineError::Core(core)) => classify_core_error(core),
            AppError::Pipeline(PipelineError::Source(source)) => classify_source_error(source),
            AppError::Pipeline(PipelineError::Store(store)) => classify_store_error(store),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Input problems are the caller's to fix; everything else is a failure of
/// the spreadsheet service or of our own credentials.
fn classify_source_error(err: &SourceError) -> ErrorParts {
    match err {
        SourceError::InvalidLocator(_) => {
            (StatusCode::BAD_REQUEST, "INVALID_SOURCE", err.to_string())
        }
        SourceError::Workbook(_) => (StatusCode::BAD_REQUEST, "INVALID_WORKBOOK", err.to_string()),
        SourceError::EmptyDocument => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "EMPTY_DOCUMENT",
            err.to_string(),
        ),
        SourceError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string()),
        SourceError::Auth { .. } | SourceError::Http(_) => {
            tracing::warn!(error = %err, "Spreadsheet service call failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The spreadsheet service could not be reached".to_string(),
            )
        }
        SourceError::Credentials(_) => {
            tracing::error!(error = %err, "Spreadsheet credentials are not usable");
            internal()
        }
        SourceError::Endpoint(_) => {
            tracing::error!(error = %err, "Spreadsheet service URL is misconfigured");
            internal()
        }
    }
}

fn classify_store_error(err: &StoreError) -> ErrorParts {
    match err {
        StoreError::Database(sqlx::Error::RowNotFound) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Store error");
            internal()
        }
    }
}
