//! Bounded decoding of JSON documents hidden inside string fields.
//!
//! Captured request and response bodies are frequently JSON text, and that
//! text sometimes carries further JSON text in its own string values. The
//! [`Normalizer`] walks a value and replaces every string that parses as a
//! JSON object or array with the parsed value, stopping at a fixed depth.
//!
//! Bodies come from whoever was on the other end of the connection, so the
//! walk never fails: strings that do not parse, lie below the depth limit or
//! are too large to decode are left as they are.

mod pretty;

pub use pretty::{pretty_full, pretty_truncate, render_pretty, truncate_preview};

use crate::config::{DEFAULT_MAX_DECODE_LEN, DEFAULT_MAX_DEPTH, EngineConfig};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};

/// Upper limit on the configurable depth
pub const MAX_DEPTH_CEILING: usize = 64;

/// Non-fatal note that part of a value was left undecoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// A JSON-looking string was larger than the decode limit
    Oversized { len: usize, limit: usize },
    /// Normalization aborted; the original value was kept
    Aborted { reason: String },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::Oversized { len, limit } => write!(
                f,
                "skipped decoding a {len} byte JSON string (limit {limit} bytes)"
            ),
            Advisory::Aborted { reason } => {
                write!(f, "normalization aborted, showing raw value: {reason}")
            }
        }
    }
}

/// Result of a contained normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: Value,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    max_depth: usize,
    max_decode_len: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Normalizer {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.min(MAX_DEPTH_CEILING),
            max_decode_len: DEFAULT_MAX_DECODE_LEN,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_depth).with_max_decode_len(config.max_decode_len)
    }

    pub fn with_max_decode_len(mut self, max_decode_len: usize) -> Self {
        self.max_decode_len = max_decode_len;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Normalize a value, discarding advisories
    pub fn normalize(&self, value: &Value) -> Value {
        self.normalize_contained(value).value
    }

    /// Normalize a value inside a failure boundary.
    ///
    /// Anything that unwinds out of the walk is caught here and replaced by
    /// the untouched input, so callers always get a value back.
    pub fn normalize_contained(&self, value: &Value) -> Normalized {
        let mut advisories = Vec::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.walk(value, 0, &mut advisories)
        }));

        match outcome {
            Ok(value) => {
                for advisory in &advisories {
                    tracing::warn!("{}", advisory);
                }
                Normalized { value, advisories }
            }
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown failure".to_string());
                let advisory = Advisory::Aborted { reason };
                tracing::warn!("{}", advisory);
                Normalized {
                    value: value.clone(),
                    advisories: vec![advisory],
                }
            }
        }
    }

    fn walk(&self, value: &Value, depth: usize, advisories: &mut Vec<Advisory>) -> Value {
        if depth >= self.max_depth {
            return value.clone();
        }

        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, v)| (key.clone(), self.walk(v, depth + 1, advisories)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|v| self.walk(v, depth + 1, advisories))
                    .collect(),
            ),
            // A decoded string takes the place of the string itself, so its
            // contents continue at the same depth. Decoding always yields an
            // object or array, whose children sit one level further down.
            Value::String(text) => match self.decode(text, advisories) {
                Some(parsed) => self.walk(&parsed, depth, advisories),
                None => value.clone(),
            },
            _ => value.clone(),
        }
    }

    fn decode(&self, text: &str, advisories: &mut Vec<Advisory>) -> Option<Value> {
        if !looks_like_json(text) {
            return None;
        }
        if text.len() > self.max_decode_len {
            advisories.push(Advisory::Oversized {
                len: text.len(),
                limit: self.max_decode_len,
            });
            return None;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(parsed) if parsed.is_object() || parsed.is_array() => Some(parsed),
            Ok(_) => None,
            Err(e) => {
                tracing::trace!("Bracketed string is not JSON: {}", e);
                None
            }
        }
    }
}

/// Normalize with the default decode limit
pub fn normalize(value: &Value, max_depth: usize) -> Value {
    Normalizer::new(max_depth).normalize(value)
}

/// True when trimmed text is wrapped in `{}` or `[]`
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}
