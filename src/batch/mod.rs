//! Batch runner.
//!
//! Sites are split into consecutive fixed-size batches. Sites within a batch
//! are inspected concurrently (one task each); the next batch starts only when
//! the previous one has finished. Results come back in input order.

mod progress;

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::{info, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, shutdown_gracefully, spawn_progress_logger};
use crate::error_handling::ErrorType;
use crate::inspect::{inspect_site, InspectionContext};
use crate::models::{InspectionResult, Site, SiteStatus};

pub use progress::{ProgressSnapshot, ProgressTracker, SiteProgress};

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    pub error: usize,
    pub captures: usize,
    pub elapsed_seconds: f64,
}

impl BatchReport {
    pub fn from_results(results: &[InspectionResult], elapsed_seconds: f64) -> Self {
        let mut report = BatchReport {
            total: results.len(),
            elapsed_seconds,
            ..Default::default()
        };
        for result in results {
            match result.status {
                SiteStatus::Up => report.up += 1,
                SiteStatus::Down => report.down += 1,
                SiteStatus::Error => report.error += 1,
            }
            if result.stored_reference.is_some() {
                report.captures += 1;
            }
        }
        report
    }
}

/// Results of a run plus its totals.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<InspectionResult>,
    pub report: BatchReport,
}

/// Inspects `sites` in batches and returns one result per site, in order.
///
/// A panicking site task is reported as an `error` result for that site;
/// the other sites are unaffected.
pub async fn run_batches(
    ctx: Arc<InspectionContext>,
    sites: Vec<Site>,
    tracker: Arc<ProgressTracker>,
) -> Vec<InspectionResult> {
    let batch_size = ctx.config.batch_size().max(1);
    let mut results = Vec::with_capacity(sites.len());

    for (index, batch) in sites.chunks(batch_size).enumerate() {
        log::debug!("Starting batch {} ({} sites)", index + 1, batch.len());

        let handles: Vec<_> = batch
            .iter()
            .cloned()
            .map(|site| {
                let ctx = Arc::clone(&ctx);
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move {
                    tracker.mark(site.id, SiteProgress::Processing);
                    let result = inspect_site(&ctx, &site).await;
                    tracker.mark(site.id, SiteProgress::Done);
                    result
                })
            })
            .collect();

        for (site, joined) in batch.iter().zip(join_all(handles).await) {
            match joined {
                Ok(result) => results.push(result),
                Err(join_error) => {
                    ctx.stats.increment_error(ErrorType::SiteTaskPanic);
                    tracker.mark(site.id, SiteProgress::Done);
                    warn!("Inspection of {} (id {}) failed: {join_error}", site.url, site.id);
                    results.push(InspectionResult::failed(
                        site,
                        format!("Inspection failed: {join_error}"),
                    ));
                }
            }
        }
    }

    results
}

/// Runs [`run_batches`] with periodic progress logging and computes the report.
pub async fn run_inspection(
    ctx: Arc<InspectionContext>,
    sites: Vec<Site>,
    tracker: Arc<ProgressTracker>,
) -> BatchOutcome {
    let start = Instant::now();
    let total = sites.len();
    info!(
        "Inspecting {} site{} (batch size {})",
        total,
        if total == 1 { "" } else { "s" },
        ctx.config.batch_size()
    );

    let cancel = CancellationToken::new();
    let logging_task = ctx
        .config
        .progress_interval
        .map(|interval| spawn_progress_logger(Arc::clone(&tracker), interval, cancel.child_token()));

    let results = run_batches(ctx, sites, Arc::clone(&tracker)).await;

    shutdown_gracefully(cancel, logging_task).await;
    log_progress(&tracker);

    let report = BatchReport::from_results(&results, start.elapsed().as_secs_f64());
    info!(
        "Run finished: {} up, {} down, {} error, {} screenshot{} in {:.1}s",
        report.up,
        report.down,
        report.error,
        report.captures,
        if report.captures == 1 { "" } else { "s" },
        report.elapsed_seconds
    );
    BatchOutcome { results, report }
}
