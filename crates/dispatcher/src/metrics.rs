//! Dispatcher metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters of one dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Events accepted by `submit`
    submitted: AtomicU64,
    /// Events appended to the pending queue
    buffered: AtomicU64,
    /// Buffered events replayed at activation
    replayed: AtomicU64,
    /// Events fanned out directly while live
    live: AtomicU64,
    /// Lifecycle notifications forwarded
    lifecycle_forwarded: AtomicU64,
    /// Lifecycle notifications arriving before activation
    lifecycle_dropped: AtomicU64,
    /// Per-backend delivery failures
    delivery_failures: AtomicU64,
    /// Buffered events that never reached a backend
    discarded: AtomicU64,
}

impl DispatcherStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_buffered(&self) {
        self.buffered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_replayed(&self, count: u64) {
        self.replayed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_live(&self) {
        self.live.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_lifecycle_forwarded(&self) {
        self.lifecycle_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_lifecycle_dropped(&self) {
        self.lifecycle_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_delivery_failures(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_discarded(&self, count: u64) {
        self.discarded.fetch_add(count, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            buffered: self.buffered.load(Ordering::Relaxed),
            replayed: self.replayed.load(Ordering::Relaxed),
            live: self.live.load(Ordering::Relaxed),
            lifecycle_forwarded: self.lifecycle_forwarded.load(Ordering::Relaxed),
            lifecycle_dropped: self.lifecycle_dropped.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub buffered: u64,
    pub replayed: u64,
    pub live: u64,
    pub lifecycle_forwarded: u64,
    pub lifecycle_dropped: u64,
    pub delivery_failures: u64,
    pub discarded: u64,
}
