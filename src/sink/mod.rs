//! Storage sinks for capture artifacts.
//!
//! A sink takes the bytes of one screenshot and returns a public locator for
//! it. Sinks are tried in order by [`SinkChain`]: object storage first when
//! configured, then the local directories.

mod local;
mod object;

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::config::CaptureConfig;
use crate::error_handling::{ErrorType, ProcessingStats, StorageError};

pub use local::LocalDirSink;
pub use object::ObjectStorageSink;

/// Destination for a capture artifact.
#[async_trait]
pub trait StorageSink: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Stores `bytes` under `filename` and returns its public reference.
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;
}

/// Ordered list of sinks; the first one that accepts the artifact wins.
#[derive(Clone, Default)]
pub struct SinkChain {
    sinks: Vec<Arc<dyn StorageSink>>,
}

impl SinkChain {
    pub fn new(sinks: Vec<Arc<dyn StorageSink>>) -> Self {
        Self { sinks }
    }

    /// Object storage (if configured) followed by the local public directory.
    pub fn from_config(config: &CaptureConfig, client: Arc<reqwest::Client>) -> Self {
        let mut sinks: Vec<Arc<dyn StorageSink>> = Vec::new();
        if let Some(storage) = &config.object_storage {
            sinks.push(Arc::new(ObjectStorageSink::new(client, storage.clone())));
        }
        if let Some(public_dir) = &config.public_dir {
            let mut local = LocalDirSink::new(public_dir.clone());
            if let Some(downloads) = &config.downloads_dir {
                local = local.with_mirror(downloads.clone());
            }
            sinks.push(Arc::new(local));
        }
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Stores the artifact in the first sink that accepts it.
    ///
    /// Returns `None` when every sink failed (or none is configured); each
    /// failure is logged and counted.
    pub async fn store(
        &self,
        filename: &str,
        bytes: &[u8],
        stats: &ProcessingStats,
    ) -> Option<String> {
        for sink in &self.sinks {
            match sink.store(filename, bytes).await {
                Ok(reference) => {
                    log::debug!("Stored {filename} via {} at {reference}", sink.name());
                    return Some(reference);
                }
                Err(e) => {
                    stats.increment_error(ErrorType::from(&e));
                    warn!("Storage sink {} failed for {filename}: {e}", sink.name());
                }
            }
        }
        if self.sinks.is_empty() {
            warn!(
                "No storage sink configured; dropping {filename}: {}",
                StorageError::NoSinkAvailable
            );
        }
        None
    }
}
