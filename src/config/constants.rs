//! Configuration constants.
//!
//! Defaults for timeouts, batch sizes and capture parameters. Every value
//! here can be overridden through [`crate::Config`] or the CLI.

use std::time::Duration;

// Liveness probe
/// HEAD request timeout for a full inspection.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
/// HEAD request timeout for liveness-only checks.
pub const FAST_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// Certificate inspection
/// Deadline for TCP connect plus TLS handshake.
pub const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
/// Handshake deadline for liveness-only checks.
pub const FAST_TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(3);
/// Port used when the URL does not name one.
pub const DEFAULT_TLS_PORT: u16 = 443;

// Visual capture
/// Total navigation budget for the headless browser.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(20);
/// Best-effort wait for network quiescence after navigation.
pub const NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(8);
/// Timeout for a remote screenshot provider call.
pub const EXTERNAL_CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for an object storage upload.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(15);
pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 720;
pub const JPEG_QUALITY: u8 = 75;
/// Quality requested from the external provider.
pub const EXTERNAL_JPEG_QUALITY: u8 = 80;
pub const SCREENSHOT_CONTENT_TYPE: &str = "image/jpeg";
/// Public path prefix under which the local sink's files are served.
pub const PUBLIC_SCREENSHOT_PREFIX: &str = "/screenshots";
pub const DEFAULT_PUBLIC_DIR: &str = "./public/screenshots";
pub const DEFAULT_BUCKET: &str = "screenshots";
pub const DEFAULT_EXTERNAL_CAPTURE_URL: &str = "https://shot.screenshotapi.net/screenshot";

/// Browser launch flags used unless `BROWSER_ARGS` says otherwise.
pub const DEFAULT_BROWSER_ARGS: &[&str] = &["--no-sandbox", "--disable-setuid-sandbox"];

// Batching
/// Concurrent inspections per batch when a local browser is launched per site.
pub const BROWSER_BATCH_SIZE: usize = 3;
/// Concurrent inspections per batch when captures go to a remote provider.
pub const EXTERNAL_BATCH_SIZE: usize = 5;
/// Concurrent inspections per batch for liveness-only checks.
pub const LIVENESS_BATCH_SIZE: usize = 10;

// Progress telemetry
/// Seconds between progress snapshots while a run is active.
pub const PROGRESS_LOG_INTERVAL_SECS: u64 = 5;

/// Default User-Agent string for liveness probes.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default address for `site_status serve`.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
