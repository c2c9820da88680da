mod options;

pub use options::FilterOptions;

use crate::analysis::{DurationBucket, status_code};
use crate::capture::LogEntry;
use crate::{Error, Result};
use glob::Pattern;

/// Entry filter applied before aggregation.
///
/// Conditions combine with AND. An entry lacking the filtered field never
/// matches that condition.
#[derive(Debug, Default)]
pub struct FilterCriteria {
    /// Any matching pattern lets the entry through
    pub hosts: Vec<HostPattern>,
    pub status: Option<StatusFilter>,
    pub duration: Option<DurationBucket>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hosts(mut self, patterns: Vec<String>) -> Result<Self> {
        for pattern in patterns {
            self.hosts.push(HostPattern::parse(&pattern)?);
        }
        Ok(self)
    }

    pub fn with_status(mut self, pattern: &str) -> Result<Self> {
        self.status = Some(StatusFilter::parse(pattern)?);
        Ok(self)
    }

    pub fn with_duration(mut self, bucket: DurationBucket) -> Self {
        self.duration = Some(bucket);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.status.is_none() && self.duration.is_none()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.matches_host(entry) && self.matches_status(entry) && self.matches_duration(entry)
    }

    fn matches_host(&self, entry: &LogEntry) -> bool {
        if self.hosts.is_empty() {
            return true;
        }
        match entry.host() {
            Some(host) => self.hosts.iter().any(|pattern| pattern.matches(&host)),
            None => false,
        }
    }

    fn matches_status(&self, entry: &LogEntry) -> bool {
        match (&self.status, entry.status()) {
            (None, _) => true,
            (Some(filter), Some(status)) => filter.matches(&status),
            (Some(_), None) => false,
        }
    }

    fn matches_duration(&self, entry: &LogEntry) -> bool {
        match self.duration {
            None => true,
            Some(bucket) => entry.duration_bucket() == Some(bucket),
        }
    }
}

/// Host pattern: exact name or glob, both case-insensitive
#[derive(Debug, Clone)]
pub enum HostPattern {
    Exact(String),
    Glob(Pattern),
}

impl HostPattern {
    /// Patterns containing `*` or `?` are globs, anything else is exact
    pub fn parse(pattern: &str) -> Result<Self> {
        let lowered = pattern.trim().to_lowercase();
        if lowered.is_empty() {
            return Err(Error::InvalidPattern("Empty host pattern".to_string()));
        }
        if lowered.contains(['*', '?']) {
            Pattern::new(&lowered).map(HostPattern::Glob).map_err(|e| {
                Error::InvalidPattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })
        } else {
            Ok(HostPattern::Exact(lowered))
        }
    }

    pub fn matches(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        match self {
            HostPattern::Exact(name) => &host == name,
            HostPattern::Glob(glob) => glob.matches(&host),
        }
    }
}

/// Status condition on an entry's status label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// Exact label, e.g. `404` or `error`
    Label(String),
    /// Inclusive numeric range, e.g. `2xx` or `500-599`
    Range(u64, u64),
}

impl StatusFilter {
    pub fn parse(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(Error::InvalidPattern("Empty status pattern".to_string()));
        }

        // Class shorthand: "2xx", "4XX"
        let lowered = pattern.to_ascii_lowercase();
        if let Some(prefix) = lowered.strip_suffix("xx")
            && prefix.len() == 1
            && let Some(digit) = prefix.chars().next().and_then(|c| c.to_digit(10))
        {
            let start = u64::from(digit) * 100;
            return Ok(StatusFilter::Range(start, start + 99));
        }

        if let Some((start, end)) = pattern.split_once('-')
            && let Ok(start) = start.trim().parse::<u64>()
        {
            let end = end.trim().parse::<u64>().map_err(|_| {
                Error::InvalidPattern(format!("Invalid status range end: {}", end))
            })?;
            if end < start {
                return Err(Error::InvalidPattern(format!(
                    "Status range {} is reversed",
                    pattern
                )));
            }
            return Ok(StatusFilter::Range(start, end));
        }

        Ok(StatusFilter::Label(pattern.to_string()))
    }

    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::Label(label) => status == label,
            StatusFilter::Range(start, end) => {
                status_code(status).is_some_and(|code| (*start..=*end).contains(&code))
            }
        }
    }
}

/// Entries passing the criteria, in input order
pub fn filter_entries(entries: &[LogEntry], criteria: &FilterCriteria) -> Vec<LogEntry> {
    let filtered: Vec<LogEntry> = entries
        .iter()
        .filter(|entry| criteria.matches(entry))
        .cloned()
        .collect();

    tracing::debug!("Filter kept {} of {} entries", filtered.len(), entries.len());
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> LogEntry {
        LogEntry::new(value)
    }

    #[test]
    fn test_status_filter_label() {
        let filter = StatusFilter::parse("404").unwrap();
        assert!(filter.matches("404"));
        assert!(!filter.matches("200"));

        let filter = StatusFilter::parse("error").unwrap();
        assert!(filter.matches("error"));
    }

    #[test]
    fn test_status_filter_class() {
        let filter = StatusFilter::parse("2xx").unwrap();
        assert_eq!(filter, StatusFilter::Range(200, 299));
        assert!(filter.matches("204"));
        assert!(!filter.matches("301"));
        assert!(!filter.matches("error"));
    }

    #[test]
    fn test_status_filter_explicit_range() {
        let filter = StatusFilter::parse("500-599").unwrap();
        assert!(filter.matches("500"));
        assert!(filter.matches("599"));
        assert!(!filter.matches("499"));
    }

    #[test]
    fn test_status_filter_invalid() {
        assert!(StatusFilter::parse("").is_err());
        assert!(StatusFilter::parse("200-abc").is_err());
        assert!(StatusFilter::parse("599-500").is_err());
    }

    #[test]
    fn test_host_patterns() {
        let exact = HostPattern::parse("API.example.com").unwrap();
        assert!(exact.matches("api.example.com"));
        assert!(!exact.matches("web.example.com"));

        let glob = HostPattern::parse("*.example.com").unwrap();
        assert!(glob.matches("CDN.example.com"));
        assert!(!glob.matches("example.org"));

        assert!(HostPattern::parse("  ").is_err());
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let entries = vec![
            entry(json!({"host": "a.com", "status": 200, "duration": 50})),
            entry(json!({"host": "a.com", "status": 500, "duration": 50})),
            entry(json!({"host": "a.com", "status": 200, "duration": 2000})),
            entry(json!({"host": "b.com", "status": 200, "duration": 50})),
            entry(json!({"status": 200, "duration": 50})),
        ];

        let criteria = FilterCriteria::new()
            .with_hosts(vec!["a.com".to_string()])
            .unwrap()
            .with_status("2xx")
            .unwrap()
            .with_duration(DurationBucket::Under100Ms);

        let filtered = filter_entries(&entries, &criteria);
        assert_eq!(filtered, vec![entries[0].clone()]);
    }

    #[test]
    fn test_empty_criteria_keep_everything() {
        let entries = vec![entry(json!({})), entry(json!("odd"))];
        let criteria = FilterCriteria::new();
        assert!(criteria.is_empty());
        assert_eq!(filter_entries(&entries, &criteria).len(), 2);
    }

    #[test]
    fn test_missing_fields_fail_active_conditions() {
        let bare = entry(json!({}));
        assert!(!FilterCriteria::new().with_status("200").unwrap().matches(&bare));
        assert!(
            !FilterCriteria::new()
                .with_duration(DurationBucket::Over5S)
                .matches(&bare)
        );
    }
}
