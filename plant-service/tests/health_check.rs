mod common;

use common::{test_config, TestApp};
use plant_service::services::init_metrics;
use plant_service::startup::Application;
use reqwest::StatusCode;
use tempfile::TempDir;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn("unused").await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "plant-service");
}

#[tokio::test]
async fn health_check_reports_missing_upload_dir() {
    let app = TestApp::spawn("unused").await;
    std::fs::remove_dir_all(&app.upload_dir).unwrap();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn("unused").await;

    let response = app.get("/ready").await;

    assert!(response.status().is_success());
}

#[tokio::test]
async fn missing_api_key_keeps_service_up_but_not_ready() {
    init_metrics();
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path().join("uploads"));
    config.google.api_key = String::new();

    let app = Application::build(config)
        .await
        .expect("Application should start without an API key");
    let address = format!("http://127.0.0.1:{}", app.port());
    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });
    let client = reqwest::Client::new();

    let health = client.get(format!("{}/health", address)).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let ready = client.get(format!("{}/ready", address)).send().await.unwrap();
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn("unused").await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "abc-123"
    );

    let generated = app.get("/health").await;
    assert!(generated.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_format() {
    let app = TestApp::spawn("unused").await;
    app.get("/health").await;

    let response = app.get("/metrics").await;

    assert!(response.status().is_success());
    let content_type = response
        .headers()
        .get("content-type")
        .expect("Missing content-type header")
        .to_str()
        .expect("Invalid content-type");
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.expect("Failed to get response body");
    assert!(
        body.is_empty() || body.contains('#') || body.contains('_'),
        "Unexpected metrics format: {}",
        body
    );
}
