//! Local filesystem sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::StorageSink;
use crate::config::PUBLIC_SCREENSHOT_PREFIX;
use crate::error_handling::StorageError;

/// Writes each artifact into the publicly served directory, plus a
/// best-effort copy into any mirror directories.
///
/// Directories are created on first use. The artifact counts as stored only
/// when the public write succeeds, since `/screenshots/{filename}` resolves
/// against that directory alone. Mirror failures are logged and ignored.
pub struct LocalDirSink {
    public_dir: PathBuf,
    mirrors: Vec<PathBuf>,
}

impl LocalDirSink {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
            mirrors: Vec::new(),
        }
    }

    /// Adds a directory that receives a copy of every artifact.
    pub fn with_mirror(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mirrors.push(dir.into());
        self
    }
}

async fn write_into(dir: &Path, filename: &str, bytes: &[u8]) -> Result<(), StorageError> {
    let path = dir.join(filename);
    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, bytes).await
    }
    .await;
    result.map_err(|source| StorageError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[async_trait]
impl StorageSink for LocalDirSink {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        write_into(&self.public_dir, filename, bytes).await?;

        for dir in &self.mirrors {
            if let Err(e) = write_into(dir, filename, bytes).await {
                log::debug!("Skipping mirror copy: {e}");
            }
        }

        Ok(format!("{PUBLIC_SCREENSHOT_PREFIX}/{filename}"))
    }
}
