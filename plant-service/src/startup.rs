//! Application startup and lifecycle management.

use crate::config::{PlantConfig, MAX_UPLOAD_BYTES, UPLOAD_URL_PREFIX};
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use crate::services::providers::VisionProvider;
use crate::services::{AnalysisService, LocalStorage, Storage};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{http_trace_layer, metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PlantConfig,
    pub analysis: AnalysisService,
}

/// Build the HTTP router. Uploads are served from `upload_dir`.
pub fn build_router(state: AppState, upload_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/plant-disease-detector", get(handlers::index))
        .route("/analyze", post(handlers::analyze_image))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest_service(UPLOAD_URL_PREFIX, ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(from_fn(metrics_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with local storage and the Gemini provider.
    pub async fn build(config: PlantConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.upload_dir)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize upload directory {}: {}",
                        config.storage.upload_dir.display(),
                        e
                    );
                    AppError::InternalError(anyhow::anyhow!("Storage initialization error: {}", e))
                })?,
        );

        let gemini_config = GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.models.vision_model.clone(),
            api_base: config.google.api_base.clone(),
            timeout: config.google.timeout(),
        };
        let provider: Arc<dyn VisionProvider> = Arc::new(
            GeminiVisionProvider::new(gemini_config)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );

        tracing::info!(
            model = %config.models.vision_model,
            "Initialized Gemini vision provider"
        );

        Self::build_with(config, storage, provider).await
    }

    /// Build the application around the given storage and provider.
    pub async fn build_with(
        config: PlantConfig,
        storage: Arc<dyn Storage>,
        provider: Arc<dyn VisionProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            analysis: AnalysisService::new(storage, provider),
        };
        let router = build_router(state, &config.storage.upload_dir);

        // Port 0 picks a random port (used by tests)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Plant service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
