//! Bus metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single dispatcher
#[derive(Debug, Default)]
pub struct BusMetrics {
    /// Total publish calls
    published: AtomicU64,
    /// Listener invocations that returned normally
    delivered: AtomicU64,
    /// Publish calls that found no listeners
    unrouted: AtomicU64,
    /// Listener panics caught under `FailurePolicy::Isolate`
    failed: AtomicU64,
    /// Total subscribe calls
    subscriptions: AtomicU64,
}

impl BusMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn inc_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn inc_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unrouted(&self) -> u64 {
        self.unrouted.load(Ordering::Relaxed)
    }

    pub fn inc_unrouted(&self) {
        self.unrouted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subscriptions(&self) -> u64 {
        self.subscriptions.load(Ordering::Relaxed)
    }

    pub fn inc_subscriptions(&self) {
        self.subscriptions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            published: self.published(),
            delivered: self.delivered(),
            unrouted: self.unrouted(),
            failed: self.failed(),
            subscriptions: self.subscriptions(),
        }
    }
}

/// Snapshot of bus metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub published: u64,
    pub delivered: u64,
    pub unrouted: u64,
    pub failed: u64,
    pub subscriptions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let metrics = BusMetrics::new();
        metrics.inc_published();
        metrics.inc_published();
        metrics.inc_delivered();
        metrics.inc_unrouted();
        metrics.inc_subscriptions();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                published: 2,
                delivered: 1,
                unrouted: 1,
                failed: 0,
                subscriptions: 1,
            }
        );
    }
}
