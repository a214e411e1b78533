//! Local-disk storage for uploaded files.

use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::AppError;

/// URL path prefix under which stored files are served.
pub const UPLOADS_ROUTE: &str = "/uploads";
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Writes `bytes` under a fresh randomized name and returns that name.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
        let name = stored_file_name(original_name);
        let path = self.dir.join(&name);

        self.ensure_dir()
            .await
            .map_err(|e| AppError::Internal(format!("creating upload dir: {}", e)))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("writing {}: {}", path.display(), e)))?;

        tracing::info!(file = %name, size = bytes.len(), "Stored upload");
        Ok(name)
    }
}

/// `<unix-millis>-<random><.ext>`, keeping a sane lower-cased extension from the client name.
pub fn stored_file_name(original_name: Option<&str>) -> String {
    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        ext
    )
}

/// Public URL for a stored file. `origin` is scheme + host, without a trailing slash.
pub fn public_url(origin: &str, name: &str) -> String {
    format!("{}{}/{}", origin.trim_end_matches('/'), UPLOADS_ROUTE, name)
}
