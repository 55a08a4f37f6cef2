//! Configuration types.
//!
//! [`Config`] is the library configuration and can be built programmatically
//! without any CLI dependencies. The CLI maps its arguments onto it in
//! [`super::cli`].

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How screenshots are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CaptureBackendKind {
    /// Launch a local headless browser per site
    Browser,
    /// Ask a remote screenshot provider for the image
    External,
    /// Never capture (liveness and certificate checks only)
    Disabled,
}

impl CaptureBackendKind {
    /// Batch size that keeps resource pressure reasonable for this backend.
    pub fn default_batch_size(self) -> usize {
        match self {
            CaptureBackendKind::Browser => BROWSER_BATCH_SIZE,
            CaptureBackendKind::External => EXTERNAL_BATCH_SIZE,
            CaptureBackendKind::Disabled => LIVENESS_BATCH_SIZE,
        }
    }
}

/// What a successful capture says about the lower-level checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OverridePolicy {
    /// A rendered page forces `status = up` and, for https URLs, `ssl_valid = true`
    CaptureImpliesHealthy,
    /// Report status and `ssl_valid` exactly as probed
    ReportAsProbed,
}

/// Object storage (Supabase Storage compatible) upload target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectStorageConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub base_url: String,
    /// Service key sent as bearer token
    pub service_key: String,
    pub bucket: String,
}

impl ObjectStorageConfig {
    /// Builds a storage config when both URL and key are present and are not
    /// the placeholder values shipped in `.env` templates.
    pub fn from_parts(
        base_url: Option<String>,
        service_key: Option<String>,
        bucket: Option<String>,
    ) -> Option<Self> {
        let base_url = base_url?.trim().trim_end_matches('/').to_string();
        let service_key = service_key?.trim().to_string();
        if base_url.is_empty()
            || service_key.is_empty()
            || base_url == "your_supabase_project_url"
            || service_key == "your_supabase_anon_key"
        {
            return None;
        }
        Some(Self {
            base_url,
            service_key,
            bucket: bucket
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        })
    }
}

/// Remote screenshot provider settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub jpeg_quality: u8,
}

impl Default for ExternalProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EXTERNAL_CAPTURE_URL.to_string(),
            api_key: "demo".to_string(),
            timeout: EXTERNAL_CAPTURE_TIMEOUT,
            jpeg_quality: EXTERNAL_JPEG_QUALITY,
        }
    }
}

/// Capture engine and storage sink settings.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub backend: CaptureBackendKind,
    pub navigation_timeout: Duration,
    pub network_idle_timeout: Duration,
    pub jpeg_quality: u8,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Chromium binary; auto-detected when `None`
    pub browser_executable: Option<PathBuf>,
    /// Extra launch flags (sandbox switches and the like)
    pub browser_args: Vec<String>,
    pub external: ExternalProviderConfig,
    /// Upload target; local directories are used alone when `None`
    pub object_storage: Option<ObjectStorageConfig>,
    /// Served under `/screenshots`; the local sink is off when `None`
    pub public_dir: Option<PathBuf>,
    /// Best-effort extra copy of every locally stored artifact
    pub downloads_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            backend: CaptureBackendKind::Browser,
            navigation_timeout: NAVIGATION_TIMEOUT,
            network_idle_timeout: NETWORK_IDLE_TIMEOUT,
            jpeg_quality: JPEG_QUALITY,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            browser_executable: None,
            browser_args: DEFAULT_BROWSER_ARGS.iter().map(|s| s.to_string()).collect(),
            external: ExternalProviderConfig::default(),
            object_storage: None,
            public_dir: Some(PathBuf::from(DEFAULT_PUBLIC_DIR)),
            downloads_dir: Some(default_downloads_dir()),
        }
    }
}

/// `~/Downloads/website_screenshots`, or a relative fallback when no home is set.
pub fn default_downloads_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home)
            .join("Downloads")
            .join("website_screenshots"),
        _ => PathBuf::from("./website_screenshots"),
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use site_status::{CaptureBackendKind, Config};
///
/// let mut config = Config::default();
/// config.capture.backend = CaptureBackendKind::Disabled;
/// assert_eq!(config.batch_size(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// HTTP User-Agent header value for liveness probes
    pub user_agent: String,

    /// Liveness probe timeout
    pub probe_timeout: Duration,

    /// TCP connect + TLS handshake deadline
    pub tls_timeout: Duration,

    /// Capture engine and storage sink settings
    pub capture: CaptureConfig,

    /// Whether a capture overrides probe/certificate results
    pub override_policy: OverridePolicy,

    /// Sites per batch; derived from the capture backend when `None`
    pub batch_size: Option<usize>,

    /// Interval between progress snapshots; disabled when `None`
    pub progress_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            probe_timeout: PROBE_TIMEOUT,
            tls_timeout: TLS_HANDSHAKE_TIMEOUT,
            capture: CaptureConfig::default(),
            override_policy: OverridePolicy::CaptureImpliesHealthy,
            batch_size: None,
            progress_interval: Some(Duration::from_secs(PROGRESS_LOG_INTERVAL_SECS)),
        }
    }
}

impl Config {
    /// Effective batch size (an explicit zero falls back to the backend default).
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .filter(|n| *n > 0)
            .unwrap_or_else(|| self.capture.backend.default_batch_size())
    }

    /// Derives the liveness-only variant used by the fast endpoint: no
    /// capture, shorter probe and handshake deadlines, larger batches.
    pub fn liveness_only(&self) -> Self {
        let mut config = self.clone();
        config.capture.backend = CaptureBackendKind::Disabled;
        config.probe_timeout = FAST_PROBE_TIMEOUT;
        config.tls_timeout = FAST_TLS_HANDSHAKE_TIMEOUT;
        config.batch_size = None;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.tls_timeout, Duration::from_secs(5));
        assert_eq!(config.capture.backend, CaptureBackendKind::Browser);
        assert_eq!(config.capture.jpeg_quality, 75);
        assert_eq!(config.capture.viewport_width, 1280);
        assert_eq!(config.capture.viewport_height, 720);
        assert_eq!(
            config.override_policy,
            OverridePolicy::CaptureImpliesHealthy
        );
        assert!(config.capture.object_storage.is_none());
        assert_eq!(
            config.capture.public_dir,
            Some(PathBuf::from(DEFAULT_PUBLIC_DIR))
        );
        assert!(config.capture.downloads_dir.is_some());
        assert_eq!(config.batch_size(), 3);
    }

    #[test]
    fn test_batch_size_follows_backend() {
        let mut config = Config::default();
        config.capture.backend = CaptureBackendKind::External;
        assert_eq!(config.batch_size(), 5);
        config.capture.backend = CaptureBackendKind::Disabled;
        assert_eq!(config.batch_size(), 10);
        config.batch_size = Some(4);
        assert_eq!(config.batch_size(), 4);
        config.batch_size = Some(0);
        assert_eq!(config.batch_size(), 10);
    }

    #[test]
    fn test_liveness_only_variant() {
        let mut config = Config::default();
        config.batch_size = Some(2);
        let fast = config.liveness_only();
        assert_eq!(fast.capture.backend, CaptureBackendKind::Disabled);
        assert_eq!(fast.probe_timeout, Duration::from_secs(5));
        assert_eq!(fast.tls_timeout, Duration::from_secs(3));
        assert_eq!(fast.batch_size(), 10);
        // The original is untouched
        assert_eq!(config.capture.backend, CaptureBackendKind::Browser);
    }

    #[test]
    fn test_object_storage_requires_url_and_key() {
        assert!(ObjectStorageConfig::from_parts(None, Some("k".into()), None).is_none());
        assert!(ObjectStorageConfig::from_parts(Some("https://a.supabase.co".into()), None, None)
            .is_none());
        assert!(ObjectStorageConfig::from_parts(
            Some("your_supabase_project_url".into()),
            Some("k".into()),
            None
        )
        .is_none());

        let cfg = ObjectStorageConfig::from_parts(
            Some("https://a.supabase.co/".into()),
            Some("secret".into()),
            None,
        )
        .expect("config should be built");
        assert_eq!(cfg.base_url, "https://a.supabase.co");
        assert_eq!(cfg.bucket, "screenshots");
    }
}
