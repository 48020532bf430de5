//! Overlay controller counters.
//!
//! Every event is counted locally, for snapshots and tests, and mirrored to
//! the `metrics` facade. Installing an exporter is left to the binary.

use std::sync::atomic::{AtomicU64, Ordering};

use aq_common::error::ErrorClass;
use metrics::counter;
use serde::Serialize;

#[derive(Debug, Default)]
pub struct OverlayMetrics {
    fetches_issued: AtomicU64,
    stale_discarded: AtomicU64,
    renders: AtomicU64,
    transport_failures: AtomicU64,
    service_failures: AtomicU64,
    malformed_payloads: AtomicU64,
}

/// Point-in-time copy of [`OverlayMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub fetches_issued: u64,
    pub stale_discarded: u64,
    pub renders: u64,
    pub transport_failures: u64,
    pub service_failures: u64,
    pub malformed_payloads: u64,
}

impl OverlayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch_issued(&self) {
        self.fetches_issued.fetch_add(1, Ordering::Relaxed);
        counter!("aq_overlay_fetches_total").increment(1);
    }

    pub fn record_stale(&self) {
        self.stale_discarded.fetch_add(1, Ordering::Relaxed);
        counter!("aq_overlay_stale_results_total").increment(1);
    }

    pub fn record_render(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
        counter!("aq_overlay_renders_total").increment(1);
    }

    /// Count a failed fetch by class. Cancellations are not failures.
    pub fn record_failure(&self, class: ErrorClass) {
        let slot = match class {
            ErrorClass::Transport => &self.transport_failures,
            ErrorClass::Service => &self.service_failures,
            ErrorClass::Malformed | ErrorClass::InvalidInput => &self.malformed_payloads,
            ErrorClass::Cancelled => return,
        };
        slot.fetch_add(1, Ordering::Relaxed);
        counter!("aq_overlay_failures_total", "class" => class.as_str()).increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fetches_issued: self.fetches_issued.load(Ordering::Relaxed),
            stale_discarded: self.stale_discarded.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            service_failures: self.service_failures.load(Ordering::Relaxed),
            malformed_payloads: self.malformed_payloads.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_by_class() {
        let metrics = OverlayMetrics::new();
        metrics.record_failure(ErrorClass::Transport);
        metrics.record_failure(ErrorClass::Service);
        metrics.record_failure(ErrorClass::Malformed);
        metrics.record_failure(ErrorClass::Cancelled);

        let snap = metrics.snapshot();
        assert_eq!(snap.transport_failures, 1);
        assert_eq!(snap.service_failures, 1);
        assert_eq!(snap.malformed_payloads, 1);
    }
}
