//! Remote screenshot provider backend.

use std::sync::Arc;

use async_trait::async_trait;

use super::CaptureBackend;
use crate::config::ExternalProviderConfig;
use crate::error_handling::CaptureError;

/// Fetches a rendered JPEG from a screenshot API.
pub struct ExternalCapture {
    client: Arc<reqwest::Client>,
    config: ExternalProviderConfig,
    width: u32,
    height: u32,
}

impl ExternalCapture {
    pub fn new(
        client: Arc<reqwest::Client>,
        config: ExternalProviderConfig,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            client,
            config,
            width,
            height,
        }
    }
}

#[async_trait]
impl CaptureBackend for ExternalCapture {
    fn name(&self) -> &'static str {
        "external"
    }

    async fn capture(&self, url: &str) -> Result<Vec<u8>, CaptureError> {
        let width = self.width.to_string();
        let height = self.height.to_string();
        let quality = self.config.jpeg_quality.to_string();
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("token", self.config.api_key.as_str()),
                ("url", url),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("format", "jpeg"),
                ("quality", quality.as_str()),
            ])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptureError::ProviderStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(bytes.to_vec())
    }
}
