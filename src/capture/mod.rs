//! Visual capture engine.
//!
//! A [`CaptureBackend`] turns a URL into JPEG bytes; the [`CaptureEngine`]
//! names the artifact, hands it to the storage sinks and reduces every failure
//! to "no screenshot". Capture problems never fail a site inspection.

mod browser;
mod external;
mod naming;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::config::{CaptureBackendKind, CaptureConfig};
use crate::error_handling::{CaptureError, ErrorType, ProcessingStats};
use crate::models::{CaptureResult, Site};
use crate::sink::SinkChain;

pub use browser::BrowserCapture;
pub use external::ExternalCapture;
pub use naming::artifact_filename;

/// Produces a rendered image of a page.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Renders `url` and returns the encoded JPEG.
    async fn capture(&self, url: &str) -> Result<Vec<u8>, CaptureError>;
}

/// Capture backend plus the sinks its artifacts go to.
#[derive(Clone)]
pub struct CaptureEngine {
    backend: Option<Arc<dyn CaptureBackend>>,
    sinks: SinkChain,
}

impl CaptureEngine {
    pub fn new(backend: Arc<dyn CaptureBackend>, sinks: SinkChain) -> Self {
        Self {
            backend: Some(backend),
            sinks,
        }
    }

    /// An engine that never captures.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            sinks: SinkChain::default(),
        }
    }

    pub fn from_config(config: &CaptureConfig, client: Arc<reqwest::Client>) -> Self {
        let backend: Arc<dyn CaptureBackend> = match config.backend {
            CaptureBackendKind::Disabled => return Self::disabled(),
            CaptureBackendKind::Browser => Arc::new(BrowserCapture::new(config.clone())),
            CaptureBackendKind::External => Arc::new(ExternalCapture::new(
                Arc::clone(&client),
                config.external.clone(),
                config.viewport_width,
                config.viewport_height,
            )),
        };
        Self::new(backend, SinkChain::from_config(config, client))
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Captures `site` and stores the artifact.
    ///
    /// Returns the stored reference, or no reference when capture is disabled,
    /// the backend failed, or no sink accepted the bytes.
    pub async fn capture_site(&self, site: &Site, stats: &ProcessingStats) -> CaptureResult {
        let Some(backend) = &self.backend else {
            return CaptureResult::none();
        };

        let bytes = match backend.capture(&site.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                stats.increment_error(ErrorType::from(&e));
                warn!("Capture of {} via {} failed: {e}", site.url, backend.name());
                return CaptureResult::none();
            }
        };

        let filename = artifact_filename(site.id);
        debug!(
            "Captured {} ({} bytes) as {filename}",
            site.url,
            bytes.len()
        );
        match self.sinks.store(&filename, &bytes, stats).await {
            Some(reference) => CaptureResult::stored(reference),
            None => CaptureResult::none(),
        }
    }
}
