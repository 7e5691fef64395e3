//! Repository for the `mqt_imports` table.

use mqt_core::types::DbId;
use sqlx::PgPool;

use crate::models::import::{CreateMqtImport, MqtImport};

/// Column list for mqt_imports queries.
const COLUMNS: &str = "id, project_id, imported_by, source_kind, source_locator, status, \
    total_rows, success_rows, failed_rows, error_message, created_at, updated_at";

/// Provides persistence for import records.
pub struct MqtImportRepo;

impl MqtImportRepo {
    /// Create an import record in `processing`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMqtImport) -> Result<MqtImport, sqlx::Error> {
        let query = format!(
            "INSERT INTO mqt_imports (project_id, imported_by, source_kind, source_locator, status)
             VALUES ($1, $2, $3, $4, 'processing')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MqtImport>(&query)
            .bind(input.project_id)
            .bind(input.imported_by)
            .bind(&input.source_kind)
            .bind(&input.source_locator)
            .fetch_one(pool)
            .await
    }

    /// Find an import by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MqtImport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mqt_imports WHERE id = $1");
        sqlx::query_as::<_, MqtImport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List imports for a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<MqtImport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mqt_imports
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, MqtImport>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a `processing` import as `completed` with its row counters.
    ///
    /// Returns `None` if the import does not exist or is no longer processing.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        total_rows: i32,
        success_rows: i32,
        failed_rows: i32,
    ) -> Result<Option<MqtImport>, sqlx::Error> {
        let query = format!(
            "UPDATE mqt_imports SET
                status = 'completed',
                total_rows = $2,
                success_rows = $3,
                failed_rows = $4
             WHERE id = $1 AND status = 'processing'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MqtImport>(&query)
            .bind(id)
            .bind(total_rows)
            .bind(success_rows)
            .bind(failed_rows)
            .fetch_optional(pool)
            .await
    }

    /// Mark a `processing` import as `failed`.
    pub async fn fail(
        pool: &PgPool,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<MqtImport>, sqlx::Error> {
        let query = format!(
            "UPDATE mqt_imports SET status = 'failed', error_message = $2
             WHERE id = $1 AND status = 'processing'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MqtImport>(&query)
            .bind(id)
            .bind(error_message)
            .fetch_optional(pool)
            .await
    }
}
