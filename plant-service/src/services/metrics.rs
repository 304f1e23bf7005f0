//! Metrics collection and Prometheus export.
//!
//! Installs the global recorder and records diagnosis-specific series on top
//! of the HTTP series emitted by `service_core::middleware::metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Must run before any metrics are recorded. Later calls are no-ops, so test
/// binaries that spawn several applications can call it freely.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .expect("failed to install Prometheus recorder")
    });
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Outcome label for `plant_analyses_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Success,
    StorageFailure,
    ProviderFailure,
}

impl AnalysisOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            AnalysisOutcome::Success => "success",
            AnalysisOutcome::StorageFailure => "storage_failure",
            AnalysisOutcome::ProviderFailure => "provider_failure",
        }
    }
}

pub fn record_analysis(outcome: AnalysisOutcome, model: &str) {
    counter!(
        "plant_analyses_total",
        "outcome" => outcome.as_str(),
        "model" => model.to_string()
    )
    .increment(1);
}

pub fn record_upload_bytes(bytes: usize) {
    counter!("plant_uploads_bytes_total").increment(bytes as u64);
}

pub fn record_provider_latency(model: &str, elapsed: Duration) {
    histogram!("plant_provider_latency_seconds", "model" => model.to_string())
        .record(elapsed.as_secs_f64());
}
