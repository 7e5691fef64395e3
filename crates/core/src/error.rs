use crate::types::DbId;
use crate::validation::RuleEvaluationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RuleEvaluationError> for CoreError {
    fn from(err: RuleEvaluationError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
