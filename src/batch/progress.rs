//! Per-run progress tracking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use serde::Serialize;

use crate::models::Site;

/// Lifecycle of one site within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SiteProgress {
    Queued = 0,
    Processing = 1,
    Done = 2,
}

impl SiteProgress {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SiteProgress::Queued,
            1 => SiteProgress::Processing,
            _ => SiteProgress::Done,
        }
    }
}

/// Progress of every site in a run, keyed by site id.
///
/// All slots are created up front, so the map itself is never written while
/// tasks run; each task only touches the atomic of its own site.
#[derive(Debug)]
pub struct ProgressTracker {
    slots: HashMap<i64, AtomicU8>,
    start: Instant,
}

/// Point-in-time counts for logging and `/status`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub queued: usize,
    pub processing: usize,
    pub done: usize,
    pub elapsed_seconds: f64,
}

impl ProgressTracker {
    pub fn new(sites: &[Site]) -> Self {
        let slots = sites
            .iter()
            .map(|site| (site.id, AtomicU8::new(SiteProgress::Queued as u8)))
            .collect();
        Self {
            slots,
            start: Instant::now(),
        }
    }

    pub fn mark(&self, id: i64, state: SiteProgress) {
        if let Some(slot) = self.slots.get(&id) {
            slot.store(state as u8, Ordering::SeqCst);
        }
    }

    pub fn state(&self, id: i64) -> Option<SiteProgress> {
        self.slots
            .get(&id)
            .map(|slot| SiteProgress::from_u8(slot.load(Ordering::SeqCst)))
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot {
            total: self.slots.len(),
            queued: 0,
            processing: 0,
            done: 0,
            elapsed_seconds: self.start.elapsed().as_secs_f64(),
        };
        for slot in self.slots.values() {
            match SiteProgress::from_u8(slot.load(Ordering::SeqCst)) {
                SiteProgress::Queued => snapshot.queued += 1,
                SiteProgress::Processing => snapshot.processing += 1,
                SiteProgress::Done => snapshot.done += 1,
            }
        }
        snapshot
    }
}
