pub mod health;
pub mod mqt;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects/{project_id}/mqt/imports/sheet      import from remote sheet (POST)
/// /projects/{project_id}/mqt/imports/file       import uploaded workbook (POST, multipart)
/// /projects/{project_id}/mqt/imports            list imports
/// /projects/{project_id}/mqt/lines              list lines (?import_id)
/// /projects/{project_id}/mqt/alerts             list alerts (?is_resolved)
/// /projects/{project_id}/mqt/statistics         project statistics
/// /projects/{project_id}/mqt/validate           validate stored lines (POST, ?import_id)
/// /projects/{project_id}/mqt/validation-rules   list, create
///
/// /mqt/imports/{id}                             get import
/// /mqt/alerts/{id}/resolve                      resolve alert (POST)
/// /mqt/validation-rules/defaults                default rule templates
/// /mqt/validation-rules/test                    dry-run a rule (POST)
/// /mqt/validation-rules/{id}                    update (PUT), delete
/// /mqt/validation-rules/{id}/toggle             enable / disable (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects/{project_id}/mqt", mqt::project_router())
        .nest("/mqt", mqt::mqt_router())
}
