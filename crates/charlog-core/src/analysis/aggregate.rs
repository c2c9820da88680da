use super::{AggregateResult, Analyzer, Tally, TimingStats};
use crate::capture::{LogEntry, UNKNOWN_LABEL};

/// Counts statuses, hosts and methods and collects numeric durations.
///
/// Every entry is handled on its own: a missing or odd field only changes
/// that entry's contribution.
pub struct TrafficAggregator;

impl Analyzer for TrafficAggregator {
    type Output = AggregateResult;

    fn analyze(&self, entries: &[LogEntry]) -> Self::Output {
        tracing::debug!("Aggregating {} entries", entries.len());

        let mut status_counts = Tally::new();
        let mut host_counts = Tally::new();
        let mut method_counts = Tally::new();
        let mut durations = Vec::new();

        for entry in entries {
            status_counts.increment(entry.status().as_deref().unwrap_or(UNKNOWN_LABEL));
            host_counts.increment(entry.host().as_deref().unwrap_or(UNKNOWN_LABEL));
            method_counts.increment(entry.method().as_deref().unwrap_or(UNKNOWN_LABEL));

            if let Some(ms) = entry.duration_ms() {
                durations.push(ms);
            }
        }

        let timing = TimingStats::from_durations(&durations);

        tracing::info!(
            "Aggregation complete: {} entries, {} hosts, {} timed",
            entries.len(),
            host_counts.len(),
            durations.len()
        );

        AggregateResult {
            total_entries: entries.len(),
            status_counts,
            host_counts,
            method_counts,
            durations,
            timing,
        }
    }
}

/// Aggregate an entry list
pub fn aggregate(entries: &[LogEntry]) -> AggregateResult {
    TrafficAggregator.analyze(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DurationBucket;
    use serde_json::json;

    fn entries(values: Vec<serde_json::Value>) -> Vec<LogEntry> {
        values.into_iter().map(LogEntry::new).collect()
    }

    #[test]
    fn test_two_entry_scenario() {
        let result = aggregate(&entries(vec![
            json!({"host": "a.com", "status": 200, "duration": 50}),
            json!({"host": "b.com", "status": 500, "duration": 1200}),
        ]));

        assert_eq!(result.status_counts.get("200"), 1);
        assert_eq!(result.status_counts.get("500"), 1);
        assert_eq!(result.status_counts.len(), 2);
        assert_eq!(result.host_counts.get("a.com"), 1);
        assert_eq!(result.host_counts.get("b.com"), 1);
        assert_eq!(result.durations, vec![50.0, 1200.0]);

        let timing = result.timing.unwrap();
        assert_eq!(timing.min, 50.0);
        assert_eq!(timing.max, 1200.0);
        assert_eq!(timing.avg, 625.0);
        assert_eq!(timing.total, 1250.0);
    }

    #[test]
    fn test_missing_fields_count_as_unknown() {
        let result = aggregate(&entries(vec![
            json!({"method": "GET"}),
            json!({"status": null}),
            json!("garbage"),
        ]));

        assert_eq!(result.total_entries, 3);
        assert_eq!(result.status_counts.get(UNKNOWN_LABEL), 3);
        assert_eq!(result.host_counts.get(UNKNOWN_LABEL), 3);
        assert_eq!(result.method_counts.get("GET"), 1);
        assert_eq!(result.method_counts.get(UNKNOWN_LABEL), 2);
        assert_eq!(result.status_counts.total(), 3);
    }

    #[test]
    fn test_no_durations_means_no_timing() {
        let result = aggregate(&entries(vec![
            json!({"host": "a.com"}),
            json!({"host": "a.com", "duration": "slow"}),
        ]));

        assert!(result.durations.is_empty());
        assert!(result.timing.is_none());
        assert_eq!(result.duration_buckets().total(), 0);
    }

    #[test]
    fn test_durations_keep_input_order_and_skip_bad_values() {
        let result = aggregate(&entries(vec![
            json!({"duration": 700}),
            json!({"duration": "x"}),
            json!({"duration": "30.5"}),
            json!({"duration": 6000}),
        ]));

        assert_eq!(result.durations, vec![700.0, 30.5, 6000.0]);

        let buckets = result.duration_buckets();
        assert_eq!(buckets.get(DurationBucket::Under100Ms), 1);
        assert_eq!(buckets.get(DurationBucket::Under1S), 1);
        assert_eq!(buckets.get(DurationBucket::Over5S), 1);
    }

    #[test]
    fn test_status_counts_sum_to_entry_count() {
        let result = aggregate(&entries(vec![
            json!({"status": 200}),
            json!({"status": "200"}),
            json!({"status": 404}),
            json!({}),
        ]));

        assert_eq!(result.status_counts.total(), 4);
        assert_eq!(result.status_counts.get("200"), 2);
    }

    #[test]
    fn test_empty_list() {
        let result = aggregate(&[]);
        assert_eq!(result.total_entries, 0);
        assert!(result.status_counts.is_empty());
        assert!(result.timing.is_none());
    }
}
