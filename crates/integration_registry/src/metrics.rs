//! Backend metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single activated backend
#[derive(Debug, Default)]
pub struct BackendMetrics {
    /// Events handled successfully
    delivered_count: AtomicU64,
    /// Events the backend failed on
    failure_count: AtomicU64,
    /// Lifecycle notifications forwarded
    lifecycle_count: AtomicU64,
}

impl BackendMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered_count(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lifecycle_count(&self) -> u64 {
        self.lifecycle_count.load(Ordering::Relaxed)
    }

    pub fn inc_lifecycle_count(&self) {
        self.lifecycle_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> BackendMetricsSnapshot {
        BackendMetricsSnapshot {
            delivered_count: self.delivered_count(),
            failure_count: self.failure_count(),
            lifecycle_count: self.lifecycle_count(),
        }
    }
}

/// Snapshot of backend metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendMetricsSnapshot {
    pub delivered_count: u64,
    pub failure_count: u64,
    pub lifecycle_count: u64,
}
