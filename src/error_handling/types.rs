//! Error type definitions.
//!
//! Typed failures for initialization and for the enrichment subsystems, plus
//! the categories counted in [`super::ProcessingStats`].

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Reasons a certificate could not be inspected.
///
/// None of these reach the caller as failures: the inspector collapses them
/// to `ssl_valid = false`.
#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Invalid server name {0}")]
    InvalidServerName(String),

    #[error("Failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake failed for {host}: {source}")]
    Handshake {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake timeout for {host}:{port} ({secs}s)")]
    Timeout { host: String, port: u16, secs: u64 },

    #[error("No peer certificate presented by {0}")]
    NoCertificate(String),

    #[error("Failed to parse certificate: {0}")]
    Parse(String),

    #[error("TLS configuration error: {0}")]
    Config(#[from] rustls::Error),
}

/// Reasons a screenshot could not be produced.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Navigation to {url} timed out after {secs}s")]
    NavigationTimeout { url: String, secs: u64 },

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Screenshot provider request failed: {0}")]
    Provider(#[from] ReqwestError),

    #[error("Screenshot provider returned HTTP {0}")]
    ProviderStatus(u16),

    #[error("Screenshot is empty")]
    Empty,
}

/// Reasons an artifact could not be stored.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(#[from] ReqwestError),

    #[error("Upload rejected with HTTP {status}: {body}")]
    UploadRejected { status: u16, body: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No storage sink accepted the artifact")]
    NoSinkAvailable,
}

/// Failure categories counted while inspecting sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Liveness probe
    ProbeTimeoutError,
    ProbeConnectError,
    ProbeBuilderError,
    ProbeRequestError,
    // Certificate inspection
    TlsConnectError,
    TlsHandshakeError,
    TlsTimeoutError,
    TlsCertificateError,
    // Visual capture
    CaptureLaunchError,
    CaptureNavigationError,
    CaptureScreenshotError,
    CaptureProviderError,
    // Storage sinks
    StorageUploadError,
    StorageWriteError,
    // Orchestration
    SiteTaskPanic,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::ProbeTimeoutError => "Liveness probe timeout",
            ErrorType::ProbeConnectError => "Liveness probe connection error",
            ErrorType::ProbeBuilderError => "Liveness probe invalid URL",
            ErrorType::ProbeRequestError => "Liveness probe request error",
            ErrorType::TlsConnectError => "TLS TCP connect error",
            ErrorType::TlsHandshakeError => "TLS handshake error",
            ErrorType::TlsTimeoutError => "TLS handshake timeout",
            ErrorType::TlsCertificateError => "TLS certificate unreadable",
            ErrorType::CaptureLaunchError => "Browser launch error",
            ErrorType::CaptureNavigationError => "Browser navigation error",
            ErrorType::CaptureScreenshotError => "Screenshot error",
            ErrorType::CaptureProviderError => "Screenshot provider error",
            ErrorType::StorageUploadError => "Object storage upload error",
            ErrorType::StorageWriteError => "Local screenshot write error",
            ErrorType::SiteTaskPanic => "Site inspection panicked",
        }
    }
}

/// Notable events that are not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// A capture forced a non-`up` status to `up`
    StatusOverridden,
    /// A capture forced `ssl_valid` to true on an https URL
    SslOverridden,
    /// Capture skipped because the probe errored
    CaptureSkipped,
    /// Certificate inspected but already expired
    CertificateExpired,
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::StatusOverridden => "Status overridden by capture",
            InfoType::SslOverridden => "SSL validity overridden by capture",
            InfoType::CaptureSkipped => "Capture skipped after probe error",
            InfoType::CertificateExpired => "Certificate expired",
        }
    }
}

impl From<&CertificateError> for ErrorType {
    fn from(e: &CertificateError) -> Self {
        match e {
            CertificateError::Connect { .. } => ErrorType::TlsConnectError,
            CertificateError::Timeout { .. } => ErrorType::TlsTimeoutError,
            CertificateError::Handshake { .. } | CertificateError::Config(_) => {
                ErrorType::TlsHandshakeError
            }
            CertificateError::MissingHost(_)
            | CertificateError::InvalidServerName(_)
            | CertificateError::NoCertificate(_)
            | CertificateError::Parse(_) => ErrorType::TlsCertificateError,
        }
    }
}

impl From<&CaptureError> for ErrorType {
    fn from(e: &CaptureError) -> Self {
        match e {
            CaptureError::Launch(_) => ErrorType::CaptureLaunchError,
            CaptureError::Navigation { .. } | CaptureError::NavigationTimeout { .. } => {
                ErrorType::CaptureNavigationError
            }
            CaptureError::Screenshot(_) | CaptureError::Empty => ErrorType::CaptureScreenshotError,
            CaptureError::Provider(_) | CaptureError::ProviderStatus(_) => {
                ErrorType::CaptureProviderError
            }
        }
    }
}

impl From<&StorageError> for ErrorType {
    fn from(e: &StorageError) -> Self {
        match e {
            StorageError::Upload(_) | StorageError::UploadRejected { .. } => {
                ErrorType::StorageUploadError
            }
            StorageError::Write { .. } | StorageError::NoSinkAvailable => {
                ErrorType::StorageWriteError
            }
        }
    }
}
