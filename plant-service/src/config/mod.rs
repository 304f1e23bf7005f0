use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

/// URL prefix under which stored uploads are served.
pub const UPLOAD_URL_PREFIX: &str = "/static/uploads";

/// Transport-level ceiling for a request body (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct PlantConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub models: ModelConfig,
    pub google: GoogleConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Vision-capable model used for diagnosis (e.g., gemini-2.0-flash)
    pub vision_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl GoogleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory uploads are written to and served from.
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub otlp_endpoint: Option<String>,
}

impl PlantConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(PlantConfig {
            common: common_config,
            models: ModelConfig {
                vision_model: get_env("PLANT_VISION_MODEL", Some("gemini-2.0-flash"), is_prod)?,
            },
            google: GoogleConfig {
                // Outside prod an unset key leaves the service up; /ready reports it.
                api_key: get_env("GOOGLE_API_KEY", Some(""), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                timeout_secs: parse_timeout_secs(&get_env(
                    "GEMINI_TIMEOUT_SECS",
                    Some(&DEFAULT_GEMINI_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?)?,
            },
            storage: StorageConfig {
                upload_dir: get_env("UPLOAD_DIR", Some("static/uploads"), is_prod)?.into(),
            },
            observability: ObservabilityConfig {
                otlp_endpoint: std::env::var("OTLP_ENDPOINT").ok(),
            },
        })
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "GEMINI_TIMEOUT_SECS must be a whole number of seconds, got {:?}: {}",
            raw,
            e
        ))
    })
}
