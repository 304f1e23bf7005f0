//! A single uploaded image as persisted by the storage adapter.

use crate::config::UPLOAD_URL_PREFIX;
use std::path::PathBuf;

/// An image persisted under the upload directory.
///
/// Created once per request and never updated. Files are not cleaned up.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Sanitized, collision-free file name inside the upload directory.
    pub filename: String,

    /// Full path on disk.
    pub path: PathBuf,

    /// Size in bytes.
    pub size: usize,
}

impl Upload {
    /// Public URL under which the static file service exposes this upload.
    pub fn public_url(&self) -> String {
        format!("{}/{}", UPLOAD_URL_PREFIX, self.filename)
    }
}
