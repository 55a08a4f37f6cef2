//! Progress logging utilities.

use std::sync::Arc;
use std::time::Duration;

use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::batch::ProgressTracker;

/// Logs a progress snapshot of the current run.
pub fn log_progress(tracker: &ProgressTracker) {
    let snapshot = tracker.snapshot();
    let rate = if snapshot.elapsed_seconds > 0.0 {
        snapshot.done as f64 / snapshot.elapsed_seconds
    } else {
        0.0
    };
    info!(
        "Inspected {}/{} sites in {:.1} seconds ({} processing, {} queued, ~{:.2} sites/sec)",
        snapshot.done,
        snapshot.total,
        snapshot.elapsed_seconds,
        snapshot.processing,
        snapshot.queued,
        rate
    );
}

/// Spawns a task that logs progress every `period` until `cancel` fires.
pub fn spawn_progress_logger(
    tracker: Arc<ProgressTracker>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately; skip it so short runs stay quiet
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => log_progress(&tracker),
                _ = cancel.cancelled() => break,
            }
        }
    })
}
