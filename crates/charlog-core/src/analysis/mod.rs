mod aggregate;
mod breakdown;
mod bucket;
mod status;
mod tally;

pub use aggregate::{TrafficAggregator, aggregate};
pub use breakdown::{HostStatusAnalyzer, HostStatusMatrix};
pub use bucket::{BucketCounts, DurationBucket};
pub use status::{StatusClass, status_code, status_sort_key};
pub use tally::Tally;

use crate::capture::LogEntry;
use serde::{Deserialize, Serialize};

/// Counts and timings computed from an entry list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total_entries: usize,
    pub status_counts: Tally,
    pub host_counts: Tally,
    pub method_counts: Tally,
    /// Numeric durations in input order
    pub durations: Vec<f64>,
    /// Present only when at least one entry had a numeric duration
    pub timing: Option<TimingStats>,
}

impl AggregateResult {
    pub fn duration_buckets(&self) -> BucketCounts {
        BucketCounts::from_durations(&self.durations)
    }
}

/// Timing statistics in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub total: f64,
}

impl TimingStats {
    pub fn from_durations(durations: &[f64]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }

        let total: f64 = durations.iter().sum();
        let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
        let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            min,
            max,
            avg: total / durations.len() as f64,
            total,
        })
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, entries: &[LogEntry]) -> Self::Output;
}
