//! In-process request metrics

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Requests received on the scheduling endpoint
pub const REQUESTS_TOTAL: &str = "scheduler_requests_total";
/// Batches scheduled successfully
pub const SCHEDULED_TOTAL: &str = "scheduler_scheduled_total";
/// Scheduling latency in milliseconds
pub const LATENCY_MS: &str = "scheduler_latency_ms";
/// Orders per batch
pub const BATCH_SIZE: &str = "scheduler_batch_size";
/// Slots per schedule
pub const SLOTS: &str = "scheduler_slots";

/// Counter name for failures of the given kind
pub fn errors_counter(kind: &str) -> String {
    format!("scheduler_errors_{}", kind)
}

/// Histogram for tracking value distributions
pub struct Histogram {
    /// Upper bucket bounds, ascending
    buckets: Vec<f64>,
    /// Counts per bucket
    counts: Vec<AtomicU64>,
    /// Values above the last bound
    overflow: AtomicU64,
    /// Sum of all values, in thousandths
    sum_milli: AtomicU64,
    /// Total count
    count: AtomicU64,
}

impl Histogram {
    /// Create histogram with default buckets
    pub fn new() -> Self {
        Self::with_buckets(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0, 5000.0,
        ])
    }

    /// Create histogram with custom buckets
    pub fn with_buckets(buckets: Vec<f64>) -> Self {
        let counts = buckets.iter().map(|_| AtomicU64::new(0)).collect();
        Histogram {
            buckets,
            counts,
            overflow: AtomicU64::new(0),
            sum_milli: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a value
    pub fn observe(&self, value: f64) {
        let value = value.max(0.0);
        self.sum_milli
            .fetch_add((value * 1000.0).round() as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        match self.buckets.iter().position(|bound| value <= *bound) {
            Some(i) => self.counts[i].fetch_add(1, Ordering::Relaxed),
            None => self.overflow.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Get mean value
    pub fn mean(&self) -> f64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.sum_milli.load(Ordering::Relaxed) as f64 / 1000.0 / count as f64
    }

    /// Get total count
    pub fn total_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Point-in-time copy
    pub fn snapshot(&self) -> HistogramSnapshot {
        let mut buckets: Vec<BucketCount> = self
            .buckets
            .iter()
            .zip(&self.counts)
            .map(|(bound, count)| BucketCount {
                le: bound.to_string(),
                count: count.load(Ordering::Relaxed),
            })
            .collect();
        buckets.push(BucketCount {
            le: "+Inf".to_string(),
            count: self.overflow.load(Ordering::Relaxed),
        });

        HistogramSnapshot {
            count: self.total_count(),
            mean: self.mean(),
            buckets,
        }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Observations falling in one bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    /// Upper bound of the bucket
    pub le: String,
    /// Observations in this bucket only
    pub count: u64,
}

/// Exported view of a histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSnapshot {
    /// Number of observations
    pub count: u64,
    /// Mean observation
    pub mean: f64,
    /// Per-bucket counts
    pub buckets: Vec<BucketCount>,
}

/// Exported view of all metrics, served on `/api/metrics`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Counter values by name
    pub counters: BTreeMap<String, u64>,
    /// Histograms by name
    pub histograms: BTreeMap<String, HistogramSnapshot>,
}

/// Thread-safe metrics storage
#[derive(Default)]
pub struct Metrics {
    histograms: RwLock<BTreeMap<String, Arc<Histogram>>>,
    counters: RwLock<BTreeMap<String, Arc<AtomicU64>>>,
}

impl Metrics {
    /// Create a new metrics store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a histogram observation
    pub fn histogram(&self, name: &str, value: f64) {
        let histograms = self.histograms.read();
        if let Some(h) = histograms.get(name) {
            h.observe(value);
            return;
        }
        drop(histograms);

        let mut histograms = self.histograms.write();
        let h = histograms
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Histogram::new()));
        h.observe(value);
    }

    /// Increment a counter
    pub fn counter(&self, name: &str, delta: u64) {
        let counters = self.counters.read();
        if let Some(c) = counters.get(name) {
            c.fetch_add(delta, Ordering::Relaxed);
            return;
        }
        drop(counters);

        let mut counters = self.counters.write();
        let c = counters
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)));
        c.fetch_add(delta, Ordering::Relaxed);
    }

    /// Get counter value
    pub fn get_counter(&self, name: &str) -> Option<u64> {
        self.counters
            .read()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
    }

    /// Get histogram mean for a metric
    pub fn get_histogram_mean(&self, name: &str) -> Option<f64> {
        self.histograms.read().get(name).map(|h| h.mean())
    }

    /// Point-in-time copy of every metric
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self
                .counters
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
                .collect(),
            histograms: self
                .histograms
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.snapshot()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_buckets() {
        let h = Histogram::with_buckets(vec![1.0, 10.0]);
        h.observe(0.5);
        h.observe(1.0);
        h.observe(7.0);
        h.observe(100.0);

        let snap = h.snapshot();
        assert_eq!(snap.count, 4);
        let counts: Vec<u64> = snap.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(snap.buckets[2].le, "+Inf");
        assert!((h.mean() - 27.125).abs() < 1e-9);
    }

    #[test]
    fn test_empty_histogram_mean() {
        assert_eq!(Histogram::new().mean(), 0.0);
    }

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        assert_eq!(metrics.get_counter(REQUESTS_TOTAL), None);
        metrics.counter(REQUESTS_TOTAL, 1);
        metrics.counter(REQUESTS_TOTAL, 2);
        assert_eq!(metrics.get_counter(REQUESTS_TOTAL), Some(3));
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = Metrics::new();
        metrics.counter(&errors_counter("validation_error"), 1);
        metrics.histogram(SLOTS, 2.0);
        metrics.histogram(SLOTS, 4.0);
        assert_eq!(metrics.get_histogram_mean(SLOTS), Some(3.0));

        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(json["counters"]["scheduler_errors_validation_error"], 1);
        assert_eq!(json["histograms"]["scheduler_slots"]["count"], 2);
    }

    #[test]
    fn test_concurrent_updates() {
        let metrics = Arc::new(Metrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.counter(REQUESTS_TOTAL, 1);
                        metrics.histogram(LATENCY_MS, 1.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.get_counter(REQUESTS_TOTAL), Some(400));
        assert_eq!(metrics.snapshot().histograms[LATENCY_MS].count, 400);
    }
}
