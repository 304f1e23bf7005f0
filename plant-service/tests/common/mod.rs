//! Test helpers: spawn the real application on a random port with a mock
//! vision provider and a throwaway upload directory.

#![allow(dead_code)]

use async_trait::async_trait;
use plant_service::config::{
    GoogleConfig, ModelConfig, ObservabilityConfig, PlantConfig, StorageConfig,
};
use plant_service::models::Upload;
use plant_service::services::providers::mock::MockVisionProvider;
use plant_service::services::providers::VisionProvider;
use plant_service::services::{init_metrics, LocalStorage, Storage, StorageError};
use plant_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub provider: Arc<MockVisionProvider>,
    pub client: reqwest::Client,
    _dir: TempDir,
}

pub fn test_config(upload_dir: PathBuf) -> PlantConfig {
    PlantConfig {
        common: CoreConfig { port: 0 },
        models: ModelConfig {
            vision_model: "mock-vision".to_string(),
        },
        google: GoogleConfig {
            api_key: "test-api-key".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
        storage: StorageConfig { upload_dir },
        observability: ObservabilityConfig {
            otlp_endpoint: None,
        },
    }
}

impl TestApp {
    /// Spawn with a provider that answers every image with `answer`.
    pub async fn spawn(answer: &str) -> Self {
        Self::spawn_with_provider(MockVisionProvider::responding(answer)).await
    }

    pub async fn spawn_with_provider(provider: MockVisionProvider) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("uploads");
        let storage = LocalStorage::new(&upload_dir)
            .await
            .expect("Failed to create storage");
        Self::spawn_inner(dir, upload_dir, Arc::new(storage), provider).await
    }

    pub async fn spawn_with_storage(
        storage: Arc<dyn Storage>,
        provider: MockVisionProvider,
    ) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");
        Self::spawn_inner(dir, upload_dir, storage, provider).await
    }

    async fn spawn_inner(
        dir: TempDir,
        upload_dir: PathBuf,
        storage: Arc<dyn Storage>,
        provider: MockVisionProvider,
    ) -> Self {
        init_metrics();

        let provider = Arc::new(provider);
        let dyn_provider: Arc<dyn VisionProvider> = provider.clone();

        let app = Application::build_with(test_config(upload_dir.clone()), storage, dyn_provider)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            upload_dir,
            provider,
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    pub async fn post_analyze(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(format!("{}/analyze", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Form with one `image` part.
pub fn image_form(file_name: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new().part(
        "image",
        reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .expect("valid mime"),
    )
}

/// Minimal JPEG header bytes; the service never decodes images.
pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9]
}

/// Storage that reports success without writing anything.
pub struct SilentlyFailingStorage;

#[async_trait]
impl Storage for SilentlyFailingStorage {
    async fn save(&self, filename: &str, data: Vec<u8>) -> Result<Upload, StorageError> {
        Ok(Upload {
            filename: filename.to_string(),
            path: PathBuf::from("/nonexistent").join(filename),
            size: data.len(),
        })
    }

    async fn exists(&self, _filename: &str) -> bool {
        false
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::NotMaterialized(filename.to_string()))
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
