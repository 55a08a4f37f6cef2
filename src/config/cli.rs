//! Command-line options.
//!
//! Parsed by `clap`; every inspection option can also be supplied through an
//! environment variable (and therefore through `.env`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::*;
use crate::config::types::{
    default_downloads_dir, CaptureBackendKind, CaptureConfig, Config, ExternalProviderConfig,
    LogFormat, LogLevel, ObjectStorageConfig, OverridePolicy,
};

/// Command-line options and configuration.
///
/// # Examples
///
/// ```bash
/// # Serve the inspection API
/// site_status serve --bind 0.0.0.0:3000
///
/// # Inspect a JSON list of sites without screenshots
/// site_status check sites.json --capture disabled
///
/// # Read sites from stdin
/// echo '[{"id":1,"url":"https://example.com"}]' | site_status check -
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "site_status",
    about = "Checks registered websites for reachability, certificate validity and a screenshot."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the inspection HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "SITE_STATUS_BIND", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,

        #[command(flatten)]
        inspection: InspectionArgs,
    },
    /// Inspect a JSON array of `{id, url}` sites and print the results
    Check {
        /// JSON file to read (`-` for stdin). Accepts `[...]` or `{"websites": [...]}`
        #[arg(value_parser)]
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print per-category error counts at the end of the run
        #[arg(long)]
        show_stats: bool,

        #[command(flatten)]
        inspection: InspectionArgs,
    },
}

/// Options shared by every command that runs inspections.
#[derive(Debug, Clone, Args)]
pub struct InspectionArgs {
    /// Screenshot backend: browser|external|disabled
    #[arg(long, env = "CAPTURE_BACKEND", value_enum, default_value_t = CaptureBackendKind::Browser)]
    pub capture: CaptureBackendKind,

    /// Whether a successful screenshot overrides probe and certificate results
    #[arg(long, value_enum, default_value_t = OverridePolicy::CaptureImpliesHealthy)]
    pub override_policy: OverridePolicy,

    /// Liveness probe timeout in seconds
    #[arg(long, default_value_t = PROBE_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_timeout_secs: u64,

    /// TLS handshake timeout in seconds
    #[arg(long, default_value_t = TLS_HANDSHAKE_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub tls_timeout_secs: u64,

    /// Browser navigation timeout in seconds
    #[arg(long, default_value_t = NAVIGATION_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub navigation_timeout_secs: u64,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    #[arg(long, default_value_t = VIEWPORT_WIDTH)]
    pub viewport_width: u32,

    #[arg(long, default_value_t = VIEWPORT_HEIGHT)]
    pub viewport_height: u32,

    /// Sites inspected concurrently per batch (default depends on --capture)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Seconds between progress log lines (0 disables them)
    #[arg(long, default_value_t = PROGRESS_LOG_INTERVAL_SECS)]
    pub progress_interval_secs: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Chromium executable (auto-detected when omitted)
    #[arg(long, env = "BROWSER_EXECUTABLE")]
    pub browser_executable: Option<PathBuf>,

    /// Browser launch flags, comma separated
    #[arg(
        long,
        env = "BROWSER_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_values_t = DEFAULT_BROWSER_ARGS.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    )]
    pub browser_args: Vec<String>,

    /// Object storage base URL; enables uploads together with the service key
    #[arg(long, env = "SUPABASE_URL")]
    pub storage_url: Option<String>,

    /// Object storage service key
    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    pub storage_key: Option<String>,

    /// Object storage bucket
    #[arg(long, env = "SUPABASE_BUCKET")]
    pub storage_bucket: Option<String>,

    /// Remote screenshot provider endpoint
    #[arg(long, env = "SCREENSHOT_API_URL", default_value = DEFAULT_EXTERNAL_CAPTURE_URL)]
    pub screenshot_api_url: String,

    /// Remote screenshot provider key
    #[arg(long, env = "SCREENSHOT_API_KEY", hide_env_values = true, default_value = "demo")]
    pub screenshot_api_key: String,

    /// Local copy of every screenshot (default ~/Downloads/website_screenshots)
    #[arg(long, env = "SCREENSHOT_DOWNLOADS_DIR")]
    pub downloads_dir: Option<PathBuf>,

    /// Publicly served screenshot directory
    #[arg(long, env = "SCREENSHOT_PUBLIC_DIR", default_value = DEFAULT_PUBLIC_DIR)]
    pub public_dir: PathBuf,
}

impl InspectionArgs {
    /// Builds the library configuration from parsed options.
    pub fn to_config(&self, log_level: LogLevel, log_format: LogFormat) -> Config {
        let downloads_dir = self
            .downloads_dir
            .clone()
            .unwrap_or_else(default_downloads_dir);

        Config {
            log_level,
            log_format,
            user_agent: self.user_agent.clone(),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            tls_timeout: Duration::from_secs(self.tls_timeout_secs),
            capture: CaptureConfig {
                backend: self.capture,
                navigation_timeout: Duration::from_secs(self.navigation_timeout_secs),
                network_idle_timeout: NETWORK_IDLE_TIMEOUT,
                jpeg_quality: self.jpeg_quality,
                viewport_width: self.viewport_width,
                viewport_height: self.viewport_height,
                browser_executable: self.browser_executable.clone(),
                browser_args: self
                    .browser_args
                    .iter()
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect(),
                external: ExternalProviderConfig {
                    api_url: self.screenshot_api_url.clone(),
                    api_key: self.screenshot_api_key.clone(),
                    ..Default::default()
                },
                object_storage: ObjectStorageConfig::from_parts(
                    self.storage_url.clone(),
                    self.storage_key.clone(),
                    self.storage_bucket.clone(),
                ),
                public_dir: Some(self.public_dir.clone()),
                downloads_dir: Some(downloads_dir),
            },
            override_policy: self.override_policy,
            batch_size: self.batch_size,
            progress_interval: (self.progress_interval_secs > 0)
                .then(|| Duration::from_secs(self.progress_interval_secs)),
        }
    }
}
