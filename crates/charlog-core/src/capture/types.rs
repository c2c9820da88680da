use crate::analysis::{DurationBucket, Tally, TimingStats};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label used for entries missing a host, status or method
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One recorded request/response exchange.
///
/// Entries are kept as the raw JSON value so unrecognized fields survive
/// untouched. A JSON `null` is treated the same as a missing field, and an
/// entry that is not an object simply exposes no fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(Value);

impl LogEntry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Look up a field by name, skipping `null` values
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object()?.get(name).filter(|v| !v.is_null())
    }

    pub fn host(&self) -> Option<String> {
        self.field("host").map(label_of)
    }

    pub fn method(&self) -> Option<String> {
        self.field("method").map(label_of)
    }

    /// Status as a label; numbers keep their JSON spelling (`200`, `200.0`)
    pub fn status(&self) -> Option<String> {
        self.field("status").map(label_of)
    }

    /// Duration in milliseconds, if the field holds something numeric
    pub fn duration_ms(&self) -> Option<f64> {
        self.field("duration").and_then(coerce_duration)
    }

    pub fn duration_bucket(&self) -> Option<DurationBucket> {
        self.duration_ms().map(DurationBucket::classify)
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.field("request_body")
    }

    pub fn response_body(&self) -> Option<&Value> {
        self.field("response_body")
    }

    /// True when either body field carries a value
    pub fn has_body(&self) -> bool {
        self.request_body().is_some() || self.response_body().is_some()
    }
}

impl From<Value> for LogEntry {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Render a field value as a table label
pub fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce a duration field to milliseconds.
///
/// Accepts JSON numbers and numeric strings; anything else, and any
/// non-finite result, yields `None`.
pub fn coerce_duration(value: &Value) -> Option<f64> {
    let ms = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    ms.is_finite().then_some(ms)
}

/// Pre-aggregated statistics document with no per-entry detail
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_entries: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_methods: Option<Tally>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_codes: Option<Tally>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Tally>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingStats>,
}

impl Summary {
    /// Build a summary from the recognized fields of a top-level object.
    ///
    /// Count tables that are not objects are dropped; missing timing fields
    /// default to zero.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            total_entries: map.get("total_entries").map(count_of).unwrap_or(0),
            request_methods: map.get("request_methods").and_then(tally_of),
            status_codes: map.get("status_codes").and_then(tally_of),
            hosts: map.get("hosts").and_then(tally_of),
            timing: map.get("timing").and_then(Value::as_object).map(|t| {
                let metric = |key: &str| t.get(key).and_then(Value::as_f64).unwrap_or(0.0);
                TimingStats {
                    min: metric("min"),
                    max: metric("max"),
                    avg: metric("avg"),
                    total: metric("total"),
                }
            }),
        }
    }
}

fn tally_of(value: &Value) -> Option<Tally> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .map(|(label, count)| (label.clone(), count_of(count)))
            .collect(),
    )
}

fn count_of(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
