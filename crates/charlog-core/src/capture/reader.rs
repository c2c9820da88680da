use super::reconcile::{ReconciledInput, reconcile};
use crate::Result;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct LogReader;

impl LogReader {
    /// Read a capture file and classify its contents
    pub fn from_file(path: &Path) -> Result<ReconciledInput> {
        let doc = Self::read_document(path)?;
        let input = reconcile(doc);

        log_outcome(&input);
        Ok(input)
    }

    /// Parse capture JSON from a string and classify it
    pub fn from_str(content: &str) -> Result<ReconciledInput> {
        tracing::debug!("Parsing capture log from string");

        let doc: Value = serde_json::from_str(content)?;
        let input = reconcile(doc);

        log_outcome(&input);
        Ok(input)
    }

    /// Decode a file into a raw JSON document without classifying it
    pub fn read_document(path: &Path) -> Result<Value> {
        tracing::debug!("Reading capture log from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let doc: Value = serde_json::from_reader(reader)?;

        Ok(doc)
    }
}

fn log_outcome(input: &ReconciledInput) {
    match input {
        ReconciledInput::EntryList(entries) => {
            tracing::info!("Loaded capture log with {} entries", entries.len())
        }
        ReconciledInput::Summary(summary) => tracing::info!(
            "Loaded summary capture log covering {} entries",
            summary.total_entries
        ),
        ReconciledInput::Empty => tracing::warn!("Capture log has no recognizable data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;

    #[test]
    fn test_parse_entry_list() {
        let input = LogReader::from_str(r#"{"entries": [{"host": "a.com", "status": 200}]}"#)
            .unwrap();
        assert_eq!(input.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let result = LogReader::from_str("{not json");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = LogReader::from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"method": "POST"}, {"method": "GET"}]"#)
            .unwrap();

        let input = LogReader::from_file(file.path()).unwrap();
        assert_eq!(input.entries().unwrap().len(), 2);
    }
}
