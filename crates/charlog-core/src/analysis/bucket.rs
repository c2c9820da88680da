use crate::{Error, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed duration ranges used for histogram-style grouping.
///
/// Ranges are half-open `[lo, hi)`; the first one absorbs everything below
/// 100ms and the last one is `[5000, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurationBucket {
    #[serde(rename = "<100ms")]
    Under100Ms,
    #[serde(rename = "100-500ms")]
    Under500Ms,
    #[serde(rename = "500ms-1s")]
    Under1S,
    #[serde(rename = "1s-5s")]
    Under5S,
    #[serde(rename = ">5s")]
    Over5S,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 5] = [
        DurationBucket::Under100Ms,
        DurationBucket::Under500Ms,
        DurationBucket::Under1S,
        DurationBucket::Under5S,
        DurationBucket::Over5S,
    ];

    pub fn classify(ms: f64) -> Self {
        if ms < 100.0 {
            DurationBucket::Under100Ms
        } else if ms < 500.0 {
            DurationBucket::Under500Ms
        } else if ms < 1000.0 {
            DurationBucket::Under1S
        } else if ms < 5000.0 {
            DurationBucket::Under5S
        } else {
            DurationBucket::Over5S
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DurationBucket::Under100Ms => "<100ms",
            DurationBucket::Under500Ms => "100-500ms",
            DurationBucket::Under1S => "500ms-1s",
            DurationBucket::Under5S => "1s-5s",
            DurationBucket::Over5S => ">5s",
        }
    }

    /// Upper bound in milliseconds (exclusive), infinite for the last bucket
    pub fn upper_ms(&self) -> f64 {
        match self {
            DurationBucket::Under100Ms => 100.0,
            DurationBucket::Under500Ms => 500.0,
            DurationBucket::Under1S => 1000.0,
            DurationBucket::Under5S => 5000.0,
            DurationBucket::Over5S => f64::INFINITY,
        }
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DurationBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        DurationBucket::ALL
            .into_iter()
            .find(|bucket| bucket.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::InvalidPattern(format!(
                    "Unknown duration bucket '{}' (expected one of: {})",
                    s,
                    DurationBucket::ALL.map(|b| b.label()).join(", ")
                ))
            })
    }
}

/// Entry counts per duration bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts([u64; 5]);

impl BucketCounts {
    pub fn from_durations(durations: &[f64]) -> Self {
        let mut counts = Self::default();
        for &ms in durations {
            counts.0[DurationBucket::classify(ms).position()] += 1;
        }
        counts
    }

    pub fn get(&self, bucket: DurationBucket) -> u64 {
        self.0[bucket.position()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// All buckets in range order, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = (DurationBucket, u64)> + '_ {
        DurationBucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.get(bucket)))
    }
}

impl Serialize for BucketCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DurationBucket::ALL.len()))?;
        for (bucket, count) in self.iter() {
            map.serialize_entry(bucket.label(), &count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_half_open() {
        assert_eq!(DurationBucket::classify(0.0), DurationBucket::Under100Ms);
        assert_eq!(DurationBucket::classify(99.99), DurationBucket::Under100Ms);
        assert_eq!(DurationBucket::classify(100.0), DurationBucket::Under500Ms);
        assert_eq!(DurationBucket::classify(499.9), DurationBucket::Under500Ms);
        assert_eq!(DurationBucket::classify(500.0), DurationBucket::Under1S);
        assert_eq!(DurationBucket::classify(1000.0), DurationBucket::Under5S);
        assert_eq!(DurationBucket::classify(4999.0), DurationBucket::Under5S);
        assert_eq!(DurationBucket::classify(5000.0), DurationBucket::Over5S);
        assert_eq!(DurationBucket::classify(1e12), DurationBucket::Over5S);
    }

    #[test]
    fn test_negative_durations_land_in_first_bucket() {
        assert_eq!(DurationBucket::classify(-5.0), DurationBucket::Under100Ms);
    }

    #[test]
    fn test_every_duration_lands_in_exactly_one_bucket() {
        let samples = [-1.0, 0.0, 50.0, 100.0, 250.0, 500.0, 999.0, 1000.0, 4000.0, 5000.0, 9e9];
        for ms in samples {
            let hits = DurationBucket::ALL
                .iter()
                .filter(|b| {
                    let lower = match b.position() {
                        0 => f64::NEG_INFINITY,
                        n => DurationBucket::ALL[n - 1].upper_ms(),
                    };
                    ms >= lower && ms < b.upper_ms()
                })
                .count();
            assert_eq!(hits, 1, "{ms}ms should match exactly one bucket");
        }
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("<100ms".parse::<DurationBucket>().unwrap(), DurationBucket::Under100Ms);
        assert_eq!("1S-5S".parse::<DurationBucket>().unwrap(), DurationBucket::Under5S);
        assert!("2s".parse::<DurationBucket>().is_err());
    }

    #[test]
    fn test_bucket_counts() {
        let counts = BucketCounts::from_durations(&[50.0, 60.0, 1200.0, 7000.0]);
        assert_eq!(counts.get(DurationBucket::Under100Ms), 2);
        assert_eq!(counts.get(DurationBucket::Under500Ms), 0);
        assert_eq!(counts.get(DurationBucket::Under5S), 1);
        assert_eq!(counts.get(DurationBucket::Over5S), 1);
        assert_eq!(counts.total(), 4);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(
            json,
            r#"{"<100ms":2,"100-500ms":0,"500ms-1s":0,"1s-5s":1,">5s":1}"#
        );
    }
}
