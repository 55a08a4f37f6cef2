//! site_status library: website inspection pipeline
//!
//! Inspects registered websites for reachability (HEAD probe), TLS certificate
//! validity and a rendered screenshot, and merges the outcomes into one record
//! per site. Sites are processed in bounded concurrent batches.
//!
//! # Example
//!
//! ```no_run
//! use site_status::{run_check, CaptureBackendKind, Config, Site};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::default();
//! config.capture.backend = CaptureBackendKind::Disabled;
//!
//! let report = run_check(&config, vec![Site::new(1, "https://example.com")]).await?;
//! for result in &report.outcome.results {
//!     println!("{} is {}", result.url, result.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod batch;
pub mod capture;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod inspect;
pub mod models;
pub mod probe;
pub mod server;
pub mod sink;
pub mod tls;

// Re-export public API
pub use app::{print_batch_summary, print_error_statistics};
pub use batch::{run_batches, run_inspection, BatchOutcome, BatchReport, ProgressTracker};
pub use config::{CaptureBackendKind, Config, LogFormat, LogLevel, OverridePolicy};
pub use inspect::{inspect_site, InspectionContext};
pub use models::{InspectionResult, Site, SiteStatus};
pub use run::{run_check, CheckReport};

// One-shot inspection of a site list (used by the `check` command)
mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};

    use crate::batch::{run_inspection, BatchOutcome, ProgressTracker};
    use crate::config::Config;
    use crate::error_handling::ProcessingStats;
    use crate::initialization::init_context;
    use crate::models::Site;

    /// Results of a one-shot run plus the statistics gathered while producing them.
    pub struct CheckReport {
        pub outcome: BatchOutcome,
        pub stats: Arc<ProcessingStats>,
    }

    /// Inspects `sites` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized. Per-site
    /// failures are reported inside the results, never as an error here.
    pub async fn run_check(config: &Config, sites: Vec<Site>) -> Result<CheckReport> {
        let stats = Arc::new(ProcessingStats::new());
        let ctx = init_context(config, Arc::clone(&stats))
            .context("Failed to initialize inspection context")?;
        let tracker = Arc::new(ProgressTracker::new(&sites));
        let outcome = run_inspection(ctx, sites, tracker).await;
        Ok(CheckReport { outcome, stats })
    }
}
