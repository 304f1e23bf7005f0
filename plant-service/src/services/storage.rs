//! Local filesystem storage for uploaded images.

use crate::models::Upload;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Failed to save image")]
    NotMaterialized(String),

    #[error("No free file name for {0}")]
    NameExhausted(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under a sanitized form of `filename`.
    async fn save(&self, filename: &str, data: Vec<u8>) -> Result<Upload, StorageError>;

    /// Whether a stored file with this exact name exists.
    async fn exists(&self, filename: &str) -> bool;

    async fn read(&self, filename: &str) -> Result<Vec<u8>, StorageError>;

    /// Whether the backing directory is usable.
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Save, then confirm the file actually landed.
    async fn save_verified(&self, filename: &str, data: Vec<u8>) -> Result<Upload, StorageError> {
        let upload = self.save(filename, data).await?;
        if !self.exists(&upload.filename).await {
            return Err(StorageError::NotMaterialized(upload.filename));
        }
        Ok(upload)
    }
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a stored name to a path, refusing anything that is not a
    /// single plain path component.
    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\', '\0'])
        {
            return None;
        }
        Some(self.base_path.join(filename))
    }

    /// Create `name` exclusively; `Ok(None)` when it is already taken.
    async fn create_exclusive(
        &self,
        name: &str,
        data: &[u8],
    ) -> Result<Option<PathBuf>, StorageError> {
        let path = self.base_path.join(name);
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.write_all(data).await?;
        file.flush().await?;
        Ok(Some(path))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn save(&self, filename: &str, data: Vec<u8>) -> Result<Upload, StorageError> {
        let sanitized = sanitize_filename(filename);
        if sanitized.is_empty() {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }

        let mut candidate = sanitized.clone();
        for _ in 0..MAX_NAME_ATTEMPTS {
            if let Some(path) = self.create_exclusive(&candidate, &data).await? {
                if candidate != sanitized {
                    tracing::debug!(
                        requested = %sanitized,
                        stored = %candidate,
                        "Upload name taken, stored under suffixed name"
                    );
                }
                return Ok(Upload {
                    filename: candidate,
                    path,
                    size: data.len(),
                });
            }
            candidate = with_suffix(&sanitized, &short_id());
        }

        Err(StorageError::NameExhausted(sanitized))
    }

    async fn exists(&self, filename: &str) -> bool {
        match self.resolve(filename) {
            Some(path) => fs::try_exists(path).await.unwrap_or(false),
            None => false,
        }
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>, StorageError> {
        let path = self
            .resolve(filename)
            .ok_or_else(|| StorageError::InvalidFilename(filename.to_string()))?;
        Ok(fs::read(path).await?)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        let metadata = fs::metadata(&self.base_path).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StorageError::Io(std::io::Error::other(format!(
                "{} is not a directory",
                self.base_path.display()
            ))))
        }
    }
}

/// Reduce a client-supplied name to a safe single path component.
///
/// The name is NFKD-decomposed so accented letters keep their base letter,
/// then remaining non-ASCII is dropped. Path separators become word breaks,
/// words are joined with `_`, anything outside `[A-Za-z0-9_.-]` is removed and
/// leading or trailing dots and underscores are trimmed. May return an empty
/// string.
pub fn sanitize_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if WINDOWS_DEVICE_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(stem))
    {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// `leaf.jpg` + `ab12` -> `leaf-ab12.jpg`
fn with_suffix(filename: &str, suffix: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, suffix, ext),
        _ => format!("{}-{}", filename, suffix),
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
