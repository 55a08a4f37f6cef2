//! Server state and response bodies.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use serde::Serialize;

use crate::batch::{BatchReport, ProgressSnapshot, ProgressTracker};
use crate::config::Config;
use crate::error_handling::{InitializationError, ProcessingStats};
use crate::initialization::init_context;
use crate::inspect::InspectionContext;

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    /// Context for `/api/screenshot` (capture as configured)
    pub full: Arc<InspectionContext>,
    /// Context for `/api/screenshot-fast` (liveness and certificate only)
    pub fast: Arc<InspectionContext>,
    pub stats: Arc<ProcessingStats>,
    pub counters: Arc<RunCounters>,
    /// Tracker of the run in progress, or of the last one
    pub latest: Arc<RwLock<Option<Arc<ProgressTracker>>>>,
    pub start_time: Arc<Instant>,
    /// Directory served under `/screenshots`
    pub public_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        full: Arc<InspectionContext>,
        fast: Arc<InspectionContext>,
        public_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            stats: Arc::clone(&full.stats),
            full,
            fast,
            counters: Arc::new(RunCounters::default()),
            latest: Arc::new(RwLock::new(None)),
            start_time: Arc::new(Instant::now()),
            public_dir,
        }
    }

    /// Builds both inspection contexts from one configuration. They share a
    /// single statistics tracker.
    pub fn from_config(
        config: &Config,
        public_dir: Option<PathBuf>,
    ) -> Result<Self, InitializationError> {
        let stats = Arc::new(ProcessingStats::new());
        let full = init_context(config, Arc::clone(&stats))?;
        let fast = init_context(&config.liveness_only(), stats)?;
        Ok(Self::new(full, fast, public_dir))
    }

    pub(crate) fn set_latest(&self, tracker: Arc<ProgressTracker>) {
        let mut latest = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *latest = Some(tracker);
    }

    pub(crate) fn latest_snapshot(&self) -> Option<ProgressSnapshot> {
        let latest = self.latest.read().unwrap_or_else(|e| e.into_inner());
        latest.as_ref().map(|tracker| tracker.snapshot())
    }
}

/// Totals accumulated across every run served by this process.
#[derive(Debug, Default)]
pub struct RunCounters {
    pub runs: AtomicUsize,
    pub sites: AtomicUsize,
    pub up: AtomicUsize,
    pub down: AtomicUsize,
    pub error: AtomicUsize,
    pub captures: AtomicUsize,
}

impl RunCounters {
    pub fn record(&self, report: &BatchReport) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.sites.fetch_add(report.total, Ordering::SeqCst);
        self.up.fetch_add(report.up, Ordering::SeqCst);
        self.down.fetch_add(report.down, Ordering::SeqCst);
        self.error.fetch_add(report.error, Ordering::SeqCst);
        self.captures.fetch_add(report.captures, Ordering::SeqCst);
    }
}

/// JSON response for `/status`
#[derive(Serialize)]
pub struct StatusResponse {
    pub uptime_seconds: f64,
    pub runs: usize,
    pub sites_inspected: usize,
    pub up: usize,
    pub down: usize,
    pub error: usize,
    pub captures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_run: Option<ProgressSnapshot>,
    pub errors: ErrorCounts,
    pub info: InfoCounts,
}

#[derive(Serialize)]
pub struct ErrorCounts {
    pub total: usize,
    pub probe: usize,
    pub tls: usize,
    pub capture: usize,
    pub storage: usize,
    pub task_panic: usize,
}

#[derive(Serialize)]
pub struct InfoCounts {
    pub total: usize,
    pub status_overridden: usize,
    pub ssl_overridden: usize,
    pub capture_skipped: usize,
    pub certificate_expired: usize,
}
