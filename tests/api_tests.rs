mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use finsync::api::router::create_router;
use finsync::AppState;

async fn build_test_app() -> axum::Router {
    let pool = common::setup_test_db().await;

    // A detached recorder handle keeps tests independent of the global
    // Prometheus recorder.
    let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

    let state = AppState {
        db: pool,
        config: common::test_config("unused"),
        http: reqwest::Client::new(),
        metrics_handle,
    };

    create_router(state)
}

#[tokio::test]
async fn test_health_reports_database_and_destination_tables() {
    let app = build_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("Body should be readable");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("Body should be JSON");

    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], true);
    // setup_test_db ensures both destination tables
    assert_eq!(json["portfolio_table"], true);
    assert_eq!(json["insider_trades_table"], true);
}

#[tokio::test]
async fn test_metrics_renders_prometheus_scrape_payload() {
    let app = build_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("Content type should be set")
        .to_str()
        .expect("Content type should be ASCII");

    assert!(content_type.starts_with("text/plain"));
}
