use super::types::{LogEntry, Summary};
use serde_json::Value;

/// Canonical shape of a loaded capture document
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciledInput {
    /// Pre-aggregated statistics only
    Summary(Summary),
    /// Per-request records
    EntryList(Vec<LogEntry>),
    /// Nothing recognizable
    Empty,
}

impl ReconciledInput {
    pub fn kind(&self) -> &'static str {
        match self {
            ReconciledInput::Summary(_) => "summary",
            ReconciledInput::EntryList(_) => "entries",
            ReconciledInput::Empty => "empty",
        }
    }

    pub fn entries(&self) -> Option<&[LogEntry]> {
        match self {
            ReconciledInput::EntryList(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReconciledInput::Empty)
    }
}

/// Classify a decoded document.
///
/// The first matching rule wins:
/// 1. an object with `"entries"` is an entry list (non-arrays become empty),
/// 2. an object with `"total_entries"` is a summary,
/// 3. a bare array is an entry list,
/// 4. anything else is empty.
pub fn reconcile(doc: Value) -> ReconciledInput {
    match doc {
        Value::Object(mut map) => {
            if let Some(entries) = map.remove("entries") {
                let entries = match entries {
                    Value::Array(items) => items.into_iter().map(LogEntry::new).collect(),
                    other => {
                        tracing::warn!(
                            "\"entries\" is not a list (found {}), treating as empty",
                            type_name(&other)
                        );
                        Vec::new()
                    }
                };
                ReconciledInput::EntryList(entries)
            } else if map.contains_key("total_entries") {
                ReconciledInput::Summary(Summary::from_map(&map))
            } else {
                tracing::debug!("Object has neither \"entries\" nor \"total_entries\"");
                ReconciledInput::Empty
            }
        }
        Value::Array(items) => {
            ReconciledInput::EntryList(items.into_iter().map(LogEntry::new).collect())
        }
        other => {
            tracing::debug!("Unsupported top-level {}", type_name(&other));
            ReconciledInput::Empty
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
