use mqt_core::error::CoreError;
use mqt_sources::SourceError;

/// Failure reported by a repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure raised by a non-SQL store.
    #[error("Store error: {0}")]
    Backend(String),
}

/// Errors surfaced by pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
