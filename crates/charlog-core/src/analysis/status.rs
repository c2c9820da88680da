use serde::Serialize;

/// Sort key for a status label: its numeric value when the label is made of
/// ASCII digits only, otherwise `0`.
pub fn status_sort_key(label: &str) -> u64 {
    if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
        label.parse().unwrap_or(u64::MAX)
    } else {
        0
    }
}

/// Parse a status label as a plain HTTP code
pub fn status_code(label: &str) -> Option<u64> {
    if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
        label.parse().ok()
    } else {
        None
    }
}

/// Coarse classification of a status label, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    Other,
}

impl StatusClass {
    pub fn of(label: &str) -> Self {
        match status_code(label) {
            Some(100..=199) => StatusClass::Informational,
            Some(200..=299) => StatusClass::Success,
            Some(300..=399) => StatusClass::Redirection,
            Some(400..=499) => StatusClass::ClientError,
            Some(500..=599) => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }
}
