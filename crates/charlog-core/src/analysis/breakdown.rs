use super::status::status_sort_key;
use super::{Analyzer, Tally};
use crate::capture::LogEntry;
use serde::Serialize;

/// Cross-tabulates the busiest hosts against status codes
pub struct HostStatusAnalyzer {
    top_n: usize,
}

impl HostStatusAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for HostStatusAnalyzer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TOP_HOSTS)
    }
}

/// Request counts per (host, status) pair.
///
/// `counts[h][s]` is the number of requests to `hosts[h]` answered with
/// `statuses[s]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostStatusMatrix {
    pub hosts: Vec<String>,
    pub statuses: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl HostStatusMatrix {
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn get(&self, host: &str, status: &str) -> u64 {
        let h = self.hosts.iter().position(|x| x == host);
        let s = self.statuses.iter().position(|x| x == status);
        match (h, s) {
            (Some(h), Some(s)) => self.counts[h][s],
            _ => 0,
        }
    }
}

impl Analyzer for HostStatusAnalyzer {
    type Output = HostStatusMatrix;

    fn analyze(&self, entries: &[LogEntry]) -> Self::Output {
        // Only entries carrying both fields take part
        let pairs: Vec<(String, String)> = entries
            .iter()
            .filter_map(|e| Some((e.host()?, e.status()?)))
            .collect();

        let mut host_tally = Tally::new();
        for (host, _) in &pairs {
            host_tally.increment(host);
        }
        let hosts: Vec<String> = host_tally
            .most_common(self.top_n)
            .into_iter()
            .map(|(host, _)| host.to_string())
            .collect();

        let mut status_tally = Tally::new();
        for (host, status) in &pairs {
            if hosts.contains(host) {
                status_tally.increment(status);
            }
        }
        let mut statuses: Vec<String> = status_tally.iter().map(|(s, _)| s.to_string()).collect();
        statuses.sort_by_key(|s| status_sort_key(s));

        let mut counts = vec![vec![0u64; statuses.len()]; hosts.len()];
        for (host, status) in &pairs {
            let h = hosts.iter().position(|x| x == host);
            let s = statuses.iter().position(|x| x == status);
            if let (Some(h), Some(s)) = (h, s) {
                counts[h][s] += 1;
            }
        }

        tracing::debug!(
            "Host/status breakdown: {} hosts x {} statuses",
            hosts.len(),
            statuses.len()
        );

        HostStatusMatrix {
            hosts,
            statuses,
            counts,
        }
    }
}
