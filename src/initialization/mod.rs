//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - HTTP client
//! - Logger
//! - TLS crypto provider
//! - The shared inspection context

mod client;
mod logger;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};

use crate::capture::CaptureEngine;
use crate::config::Config;
use crate::error_handling::{InitializationError, ProcessingStats};
use crate::inspect::InspectionContext;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Installs `ring` as the process-wide `rustls` provider. Must run before the
/// first TLS connection is established.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}

/// Builds the shared inspection context from configuration.
///
/// Creates the HTTP client, the capture engine (with its sink chain) and a
/// fresh statistics tracker.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
pub fn init_context(
    config: &Config,
    stats: Arc<ProcessingStats>,
) -> Result<Arc<InspectionContext>, InitializationError> {
    let client = init_client(config)?;
    let capture = CaptureEngine::from_config(&config.capture, Arc::clone(&client));
    Ok(Arc::new(InspectionContext::new(
        config.clone(),
        client,
        capture,
        stats,
    )))
}
