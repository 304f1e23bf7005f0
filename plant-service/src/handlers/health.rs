use crate::startup::AppState;
use crate::services::get_metrics;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness: the upload directory must be usable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.analysis.storage().health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "plant-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "plant-service",
                "error": e.to_string()
            })),
        ),
    }
}

/// Readiness: storage usable and the model provider configured.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage = state.analysis.storage().health_check().await;
    let provider = state.analysis.provider().health_check().await;

    match (storage, provider) {
        (Ok(_), Ok(_)) => StatusCode::OK,
        (storage, provider) => {
            tracing::warn!(
                storage_error = ?storage.err(),
                provider_error = ?provider.err(),
                "Readiness check failed"
            );
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
