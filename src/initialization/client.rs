//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;

/// Initializes the HTTP client shared by the liveness probe, the external
/// screenshot provider and the object storage sink.
///
/// No client-wide timeout is set: each caller applies its own per-request
/// deadline (probe, provider and upload budgets differ).
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.probe_timeout)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()?;
    Ok(Arc::new(client))
}
