use super::Normalizer;
use serde_json::Value;

/// Marker appended to cut previews
pub const TRUNCATION_MARKER: &str = "...";

/// Full detail rendering of a field value.
///
/// The value is normalized, then printed as 2-space indented JSON with
/// non-ASCII characters kept as-is. Strings that stay strings are shown as
/// raw text; absent or null values render as an empty string.
pub fn pretty_full(value: Option<&Value>, normalizer: &Normalizer) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => render_pretty(&normalizer.normalize(value)),
    }
}

/// Table preview of a field value, cut to `max_len` characters
pub fn pretty_truncate(value: Option<&Value>, normalizer: &Normalizer, max_len: usize) -> String {
    truncate_preview(&pretty_full(value, normalizer), max_len)
}

/// Print an already-normalized value
pub fn render_pretty(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Cut text longer than `max_len` characters.
///
/// Prefers the last line break before the limit (keeping the break before
/// the marker); falls back to a hard cut at the limit.
pub fn truncate_preview(text: &str, max_len: usize) -> String {
    let cut = match text.char_indices().nth(max_len) {
        Some((byte_pos, _)) => byte_pos,
        None => return text.to_string(),
    };

    let head = &text[..cut];
    match head.rfind('\n') {
        Some(newline) if newline > 0 => format!("{}\n{}", &text[..newline], TRUNCATION_MARKER),
        _ => format!("{}{}", head, TRUNCATION_MARKER),
    }
}
