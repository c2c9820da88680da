use crate::analysis::DurationBucket;
use crate::capture::LogEntry;
use serde::Serialize;
use std::collections::BTreeSet;

/// Values a user can pick from when narrowing an entry list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Distinct hosts, sorted
    pub hosts: Vec<String>,
    /// Distinct status labels, sorted as text
    pub statuses: Vec<String>,
    /// Buckets that at least one entry falls into, in range order
    pub durations: Vec<DurationBucket>,
}

impl FilterOptions {
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut hosts = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        let mut durations = BTreeSet::new();

        for entry in entries {
            if let Some(host) = entry.host() {
                hosts.insert(host);
            }
            if let Some(status) = entry.status() {
                statuses.insert(status);
            }
            if let Some(bucket) = entry.duration_bucket() {
                durations.insert(bucket);
            }
        }

        Self {
            hosts: hosts.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
            durations: durations.into_iter().collect(),
        }
    }
}
