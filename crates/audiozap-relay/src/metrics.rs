//! Relay core metrics.
//!
//! Tracks what this core can observe on its own: events received, stored,
//! rejected, and deleted, plus queries served. Connection and bandwidth
//! counters belong to the external transport, not here.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector shared across the ingest and query paths.
#[derive(Debug)]
pub struct RelayMetrics {
    start_time: Instant,
    events_received: AtomicU64,
    events_stored: AtomicU64,
    events_rejected: AtomicU64,
    events_deleted: AtomicU64,
    queries_served: AtomicU64,
}

impl RelayMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            events_received: AtomicU64::new(0),
            events_stored: AtomicU64::new(0),
            events_rejected: AtomicU64::new(0),
            events_deleted: AtomicU64::new(0),
            queries_served: AtomicU64::new(0),
        }
    }

    pub fn event_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn event_stored(&self) {
        self.events_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn event_rejected(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn event_deleted(&self) {
        self.events_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn query_served(&self) {
        self.queries_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let received = self.events_received.load(Ordering::Relaxed);
        let stored = self.events_stored.load(Ordering::Relaxed);

        MetricsSnapshot {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            events_received: received,
            events_stored: stored,
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
            events_deleted: self.events_deleted.load(Ordering::Relaxed),
            queries_served: self.queries_served.load(Ordering::Relaxed),
            acceptance_rate: if received > 0 {
                stored as f64 / received as f64
            } else {
                0.0
            },
        }
    }
}

impl Default for RelayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable point-in-time view of the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub uptime_seconds: u64,
    pub events_received: u64,
    pub events_stored: u64,
    pub events_rejected: u64,
    pub events_deleted: u64,
    pub queries_served: u64,
    pub acceptance_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let snapshot = RelayMetrics::new().snapshot();
        assert_eq!(snapshot.events_received, 0);
        assert_eq!(snapshot.events_stored, 0);
        assert_eq!(snapshot.acceptance_rate, 0.0);
    }

    #[test]
    fn test_acceptance_rate() {
        let metrics = RelayMetrics::new();
        for _ in 0..4 {
            metrics.event_received();
        }
        metrics.event_stored();
        metrics.event_stored();
        metrics.event_stored();
        metrics.event_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_received, 4);
        assert_eq!(snapshot.events_stored, 3);
        assert_eq!(snapshot.events_rejected, 1);
        assert!((snapshot.acceptance_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = RelayMetrics::new();
        metrics.event_received();
        metrics.query_served();

        let json = serde_json::to_string(&metrics.snapshot()).unwrap();
        assert!(json.contains("\"events_received\":1"));
        assert!(json.contains("\"queries_served\":1"));
    }
}
