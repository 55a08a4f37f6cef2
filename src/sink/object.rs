//! Object storage upload (Supabase Storage REST API).

use std::sync::Arc;

use async_trait::async_trait;

use super::StorageSink;
use crate::config::{ObjectStorageConfig, SCREENSHOT_CONTENT_TYPE, UPLOAD_TIMEOUT};
use crate::error_handling::StorageError;

/// Uploads artifacts to a bucket and returns their public URL.
pub struct ObjectStorageSink {
    client: Arc<reqwest::Client>,
    config: ObjectStorageConfig,
}

impl ObjectStorageSink {
    pub fn new(client: Arc<reqwest::Client>, config: ObjectStorageConfig) -> Self {
        Self { client, config }
    }

    fn upload_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, self.config.bucket, path
        )
    }

    /// Public locator of an uploaded object.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, self.config.bucket, path
        )
    }
}

#[async_trait]
impl StorageSink for ObjectStorageSink {
    fn name(&self) -> &'static str {
        "object-storage"
    }

    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let response = self
            .client
            .post(self.upload_url(filename))
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .header(reqwest::header::CONTENT_TYPE, SCREENSHOT_CONTENT_TYPE)
            .header("x-upsert", "true")
            .timeout(UPLOAD_TIMEOUT)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadRejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(self.public_url(filename))
    }
}
