//! Destinations for exported payloads.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use super::CsvPayload;
use crate::error::{MolSearchError, Result};

/// Receives finished exports.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Hand over a payload. Returns where it ended up, if it has a location.
    async fn deliver(&self, payload: CsvPayload) -> Result<Option<PathBuf>>;
}

/// Writes each payload into a directory under its file name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for a payload.
    pub fn path_for(&self, payload: &CsvPayload) -> Result<PathBuf> {
        let name = Path::new(&payload.file_name);
        match name.file_name() {
            Some(file_name) if file_name == name.as_os_str() => Ok(self.dir.join(file_name)),
            _ => Err(MolSearchError::Validation {
                field: "file_name".into(),
                message: format!("'{}' is not a plain file name", payload.file_name),
            }),
        }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, payload: CsvPayload) -> Result<Option<PathBuf>> {
        let path = self.path_for(&payload)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| MolSearchError::Io {
                message: format!("Failed to create directory {}", self.dir.display()),
                path: Some(self.dir.clone()),
                source: Some(e),
            })?;
        tokio::fs::write(&path, &payload.bytes)
            .await
            .map_err(|e| MolSearchError::io_with_path(e, &path))?;
        info!("Wrote export {} ({} bytes)", path.display(), payload.len());
        Ok(Some(path))
    }
}

/// Keeps payloads in memory, for embedding UIs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    payloads: Mutex<Vec<CsvPayload>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads delivered so far, oldest first.
    pub async fn payloads(&self) -> Vec<CsvPayload> {
        self.payloads.lock().await.clone()
    }

    pub async fn take(&self) -> Vec<CsvPayload> {
        std::mem::take(&mut *self.payloads.lock().await)
    }
}

#[async_trait]
impl DownloadSink for MemorySink {
    async fn deliver(&self, payload: CsvPayload) -> Result<Option<PathBuf>> {
        self.payloads.lock().await.push(payload);
        Ok(None)
    }
}
