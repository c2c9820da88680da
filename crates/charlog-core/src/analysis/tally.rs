use super::status::status_sort_key;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::HashMap;

/// Label → count table that remembers first-seen order.
///
/// Every ranking below is a stable sort, so equal counts keep the order in
/// which their labels first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    pub fn add(&mut self, label: &str, count: u64) {
        match self.index.get(label) {
            Some(&pos) => self.counts[pos].1 += count,
            None => {
                self.index.insert(label.to_string(), self.counts.len());
                self.counts.push((label.to_string(), count));
            }
        }
    }

    /// Count for a label, zero if never seen
    pub fn get(&self, label: &str) -> u64 {
        self.index
            .get(label)
            .map(|&pos| self.counts[pos].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Labels and counts in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Highest count first
    pub fn by_count_desc(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `n` highest counts
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked = self.by_count_desc();
        ranked.truncate(n);
        ranked
    }

    /// Ascending by numeric status code.
    ///
    /// Labels that are not plain digit strings sort as code `0`, so `"error"`
    /// lands ahead of `"100"` and alongside a literal `"0"`.
    pub fn by_status_code(&self) -> Vec<(&str, u64)> {
        let mut ordered: Vec<_> = self.iter().collect();
        ordered.sort_by_key(|(label, _)| status_sort_key(label));
        ordered
    }
}

impl FromIterator<(String, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for (label, count) in iter {
            tally.add(&label, count);
        }
        tally
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (label, count) in &self.counts {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(pairs: &[(&str, u64)]) -> Tally {
        pairs.iter().map(|(l, c)| (l.to_string(), *c)).collect()
    }

    #[test]
    fn test_increment_keeps_first_seen_order() {
        let mut t = Tally::new();
        for label in ["GET", "POST", "GET", "PUT"] {
            t.increment(label);
        }
        let labels: Vec<_> = t.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["GET", "POST", "PUT"]);
        assert_eq!(t.get("GET"), 2);
        assert_eq!(t.get("DELETE"), 0);
        assert_eq!(t.total(), 4);
    }

    #[test]
    fn test_by_count_desc_is_stable() {
        let t = tally(&[("PUT", 1), ("GET", 5), ("POST", 1), ("HEAD", 5)]);
        assert_eq!(
            t.by_count_desc(),
            vec![("GET", 5), ("HEAD", 5), ("PUT", 1), ("POST", 1)]
        );
    }

    #[test]
    fn test_most_common_truncates() {
        let t = tally(&[("a", 1), ("b", 3), ("c", 2)]);
        assert_eq!(t.most_common(2), vec![("b", 3), ("c", 2)]);
        assert_eq!(t.most_common(10).len(), 3);
    }

    #[test]
    fn test_status_order_puts_non_numeric_first() {
        let t = tally(&[("404", 1), ("100", 1), ("error", 1), ("200", 1), ("0", 1)]);
        let order: Vec<_> = t.by_status_code().into_iter().map(|(l, _)| l).collect();
        assert_eq!(order, vec!["error", "0", "100", "200", "404"]);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let t = tally(&[("b.com", 2), ("a.com", 1)]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"b.com":2,"a.com":1}"#);
    }
}
