//! Health check and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = common::build_test_app(None);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"]["reachable"], false);
    assert!(json["database"]["latency_ms"].is_null());
    assert_eq!(json["database"]["mqt_tables"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_reports_import_settings() {
    let app = common::build_test_app(None);
    let json = body_json(get(app, "/health").await).await;

    let config = common::test_config();
    assert_eq!(json["imports"]["sheet_range"], config.sheet_range);
    assert_eq!(json["imports"]["validate_on_import"], true);
    assert_eq!(
        json["imports"]["max_upload_bytes"],
        config.max_upload_bytes as u64
    );
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(None);
    let response = get(app, "/api/v1/mqt/validation-rules/defaults").await;

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(None);
    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
