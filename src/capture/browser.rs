//! Headless Chromium backend.
//!
//! Every capture launches its own browser process with a private profile
//! directory and tears it down before returning, on success and failure
//! alike. Nothing is shared between captures.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use log::debug;
use tempfile::TempDir;

use super::CaptureBackend;
use crate::config::CaptureConfig;
use crate::error_handling::CaptureError;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Renders a page in a fresh headless browser and returns a JPEG.
pub struct BrowserCapture {
    config: CaptureConfig,
}

impl BrowserCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self, profile: &TempDir) -> Result<BrowserConfig, CaptureError> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.config.viewport_width, self.config.viewport_height)
            .viewport(Viewport {
                width: self.config.viewport_width,
                height: self.config.viewport_height,
                ..Default::default()
            })
            .user_data_dir(profile.path())
            .request_timeout(self.config.navigation_timeout)
            .arg("--ignore-certificate-errors")
            .args(self.config.browser_args.iter().map(String::as_str));
        if let Some(path) = &self.config.browser_executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(CaptureError::Launch)
    }

    /// Navigates, waits for the page to settle and takes the screenshot.
    async fn render(&self, page: &Page, url: &str) -> Result<Vec<u8>, CaptureError> {
        let nav_timeout = self.config.navigation_timeout;
        match tokio::time::timeout(nav_timeout, page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(CaptureError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(CaptureError::NavigationTimeout {
                    url: url.to_string(),
                    secs: nav_timeout.as_secs(),
                })
            }
        }

        // Quiescence is best effort: a page that never settles is still captured
        if tokio::time::timeout(self.config.network_idle_timeout, wait_until_loaded(page))
            .await
            .is_err()
        {
            debug!("{url} did not settle within {:?}", self.config.network_idle_timeout);
        }
        tokio::time::sleep(SETTLE_DELAY).await;

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Jpeg)
            .quality(i64::from(self.config.jpeg_quality))
            .full_page(false)
            .build();
        let bytes = page
            .screenshot(params)
            .await
            .map_err(|e| CaptureError::Screenshot(e.to_string()))?;
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(bytes)
    }
}

async fn wait_until_loaded(page: &Page) {
    loop {
        let ready = match page.evaluate("document.readyState").await {
            Ok(result) => result
                .into_value::<String>()
                .map(|state| state == "complete")
                .unwrap_or(false),
            Err(_) => false,
        };
        if ready {
            return;
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
}

#[async_trait]
impl CaptureBackend for BrowserCapture {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn capture(&self, url: &str) -> Result<Vec<u8>, CaptureError> {
        let profile = TempDir::new()
            .map_err(|e| CaptureError::Launch(format!("profile directory: {e}")))?;
        let config = self.browser_config(&profile)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CaptureError::Launch(e.to_string()))?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = match browser.new_page("about:blank").await {
            Ok(page) => self.render(&page, url).await,
            Err(e) => Err(CaptureError::Launch(e.to_string())),
        };

        if let Err(e) = browser.close().await {
            debug!("Browser close for {url} failed: {e}");
        }
        if let Err(e) = browser.wait().await {
            debug!("Browser wait for {url} failed: {e}");
        }
        handler_task.abort();
        drop(browser);
        drop(profile);

        result
    }
}
