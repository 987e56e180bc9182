// src/storage.rs
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object path: {0}")]
    InvalidPath(String),

    #[error("object storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Public object storage for uploaded assets.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` under `path` and returns the public URL.
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError>;

    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// The object path behind `url` when the URL was issued by this storage.
    fn object_path(&self, url: &str) -> Option<String>;
}

/// Stores objects as flat files in a directory that is served under `public_base`.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn file_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let valid = !path.is_empty()
            && path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !path.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError> {
        let file = self.file_path(path)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&file, bytes).await?;
        tracing::info!(%path, %content_type, size = bytes.len(), "Stored object");
        Ok(format!("{}/{}", self.public_base, path))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let file = self.file_path(path)?;
        tokio::fs::remove_file(&file).await?;
        Ok(())
    }

    fn object_path(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(&self.public_base)?.strip_prefix('/')?;
        self.file_path(rest).ok().map(|_| rest.to_string())
    }
}
