//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, batch sizes, capture defaults)
//! - The library [`Config`] and its nested capture/storage settings
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Command, InspectionArgs, Opt};
pub use constants::*;
pub use types::{
    default_downloads_dir, CaptureBackendKind, CaptureConfig, Config, ExternalProviderConfig,
    LogFormat, LogLevel, ObjectStorageConfig, OverridePolicy,
};
