//! Metrics collection for partitioning runs
//!
//! Counters track discrete events (file scans, entries emitted per part);
//! samples track measured values such as scan durations and support simple
//! aggregation. Clones of a [`MetricsCollector`] share the same storage, so a
//! streaming iterator can report into the collector of the partitioner that
//! created it.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Counter incremented once per full read of the source file
pub const FILE_SCANS: &str = "file_scans";

/// Counter incremented once per entry yielded by a partitioned stream
pub const ENTRIES_EMITTED: &str = "entries_emitted";

/// Sample recorded with the duration of every counting scan, in milliseconds
pub const SCAN_MS: &str = "scan_ms";

/// Counter id holding the number of entries emitted into `part`
pub fn part_entries_metric(part: usize) -> String {
    format!("part_entries:{}", part)
}

/// Type of aggregation to apply to recorded samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationType {
    /// Sum of all values
    Sum,
    /// Average (mean) of all values
    Avg,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

#[derive(Debug, Default)]
struct Store {
    counters: HashMap<String, u64>,
    samples: HashMap<String, Vec<f64>>,
}

/// Thread-safe metrics collector
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    store: Arc<Mutex<Store>>,
}

impl MetricsCollector {
    /// Create a new, empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter by 1
    ///
    /// # Examples
    /// ```
    /// use kfold::core::metrics::MetricsCollector;
    ///
    /// let collector = MetricsCollector::new();
    /// collector.increment("file_scans");
    /// assert_eq!(collector.counter("file_scans"), 1);
    /// ```
    pub fn increment(&self, metric_id: &str) {
        self.add(metric_id, 1);
    }

    /// Add `amount` to a counter
    pub fn add(&self, metric_id: &str, amount: u64) {
        if amount == 0 {
            return;
        }
        let mut store = self.store.lock();
        *store.counters.entry(metric_id.to_string()).or_insert(0) += amount;
    }

    /// Current value of a counter (0 if it was never touched)
    pub fn counter(&self, metric_id: &str) -> u64 {
        self.store.lock().counters.get(metric_id).copied().unwrap_or(0)
    }

    /// Record a sample value
    pub fn record(&self, metric_id: &str, value: f64) {
        self.store
            .lock()
            .samples
            .entry(metric_id.to_string())
            .or_default()
            .push(value);
    }

    /// All recorded samples for a metric
    pub fn get_values(&self, metric_id: &str) -> Vec<f64> {
        self.store
            .lock()
            .samples
            .get(metric_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Aggregate the samples of a metric, or `None` if nothing was recorded
    pub fn aggregate(&self, metric_id: &str, agg_type: AggregationType) -> Option<f64> {
        let values = self.get_values(metric_id);
        if values.is_empty() {
            return None;
        }

        match agg_type {
            AggregationType::Sum => Some(values.iter().sum()),
            AggregationType::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
            AggregationType::Min => values.iter().cloned().reduce(f64::min),
            AggregationType::Max => values.iter().cloned().reduce(f64::max),
        }
    }

    /// Number of full reads of the source file so far
    pub fn file_scans(&self) -> u64 {
        self.counter(FILE_SCANS)
    }

    /// Number of entries emitted into `part` across all streams so far
    pub fn entries_in_part(&self, part: usize) -> u64 {
        self.counter(&part_entries_metric(part))
    }

    /// Ids of every counter and sample series with data
    pub fn get_metric_ids(&self) -> Vec<String> {
        let store = self.store.lock();
        let mut ids: Vec<String> = store
            .counters
            .keys()
            .chain(store.samples.keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Drop every counter and sample
    pub fn clear(&self) {
        let mut store = self.store.lock();
        store.counters.clear();
        store.samples.clear();
    }
}
