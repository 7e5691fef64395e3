//! Route definitions for the MQT resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{imports, reports, validation_rules};
use crate::state::AppState;

/// Routes mounted at `/projects/{project_id}/mqt`.
///
/// ```text
/// POST   /imports/sheet      -> import_sheet
/// POST   /imports/file       -> import_file
/// GET    /imports            -> list_imports
/// GET    /lines              -> list_lines      (?import_id)
/// GET    /alerts             -> list_alerts     (?is_resolved)
/// GET    /statistics         -> get_statistics
/// POST   /validate           -> validate        (?import_id)
/// GET    /validation-rules   -> list_rules
/// POST   /validation-rules   -> create_rule
/// ```
pub fn project_router() -> Router<AppState> {
    Router::new()
        .route("/imports/sheet", post(imports::import_sheet))
        .route("/imports/file", post(imports::import_file))
        .route("/imports", get(imports::list_imports))
        .route("/lines", get(reports::list_lines))
        .route("/alerts", get(reports::list_alerts))
        .route("/statistics", get(reports::get_statistics))
        .route("/validate", post(reports::validate))
        .route(
            "/validation-rules",
            get(validation_rules::list_rules).post(validation_rules::create_rule),
        )
}

/// Routes mounted at `/mqt`.
///
/// ```text
/// GET    /imports/{id}                   -> get_import
/// POST   /alerts/{id}/resolve            -> resolve_alert
/// GET    /validation-rules/defaults      -> list_default_rules
/// POST   /validation-rules/test          -> test_rule
/// PUT    /validation-rules/{id}          -> update_rule
/// DELETE /validation-rules/{id}          -> delete_rule
/// PUT    /validation-rules/{id}/toggle   -> toggle_rule
/// ```
pub fn mqt_router() -> Router<AppState> {
    Router::new()
        .route("/imports/{id}", get(imports::get_import))
        .route("/alerts/{id}/resolve", post(reports::resolve_alert))
        .route(
            "/validation-rules/defaults",
            get(validation_rules::list_default_rules),
        )
        .route("/validation-rules/test", post(validation_rules::test_rule))
        .route(
            "/validation-rules/{id}",
            put(validation_rules::update_rule).delete(validation_rules::delete_rule),
        )
        .route("/validation-rules/{id}/toggle", put(validation_rules::toggle_rule))
}
