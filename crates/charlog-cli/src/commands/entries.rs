use super::input::load_entries;
use crate::OutputFormat;
use anyhow::Result;
use charlog_core::EngineConfig;
use charlog_core::capture::{LogEntry, UNKNOWN_LABEL};
use charlog_core::filter::FilterCriteria;
use charlog_core::normalize::{Normalizer, pretty_truncate};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;

/// Rows are prepared in chunks of this size
pub const CHUNK_SIZE: usize = 50;

/// Body previews for more entries than this show a progress bar
pub const PROGRESS_THRESHOLD: usize = 100;

/// One line of the entry table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryRow {
    pub index: usize,
    pub method: String,
    pub status: String,
    pub host: String,
    pub duration: Option<f64>,
    pub request_body: String,
    pub response_body: String,
}

impl EntryRow {
    pub fn from_entry(index: usize, entry: &LogEntry, normalizer: &Normalizer, max_len: usize) -> Self {
        let label = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        Self {
            index,
            method: label(entry.method()),
            status: label(entry.status()),
            host: label(entry.host()),
            duration: entry.duration_ms(),
            request_body: pretty_truncate(entry.request_body(), normalizer, max_len),
            response_body: pretty_truncate(entry.response_body(), normalizer, max_len),
        }
    }
}

/// Build table rows for `entries`, keeping each entry's position in the
/// unfiltered list as its index.
pub fn collect_rows(
    entries: &[(usize, LogEntry)],
    normalizer: &Normalizer,
    max_len: usize,
) -> Vec<EntryRow> {
    let with_bodies = entries.iter().filter(|(_, e)| e.has_body()).count();
    let progress = (with_bodies > PROGRESS_THRESHOLD).then(|| progress_bar(entries.len()));

    let mut rows = Vec::with_capacity(entries.len());
    for chunk in entries.chunks(CHUNK_SIZE) {
        rows.extend(
            chunk
                .iter()
                .map(|(index, entry)| EntryRow::from_entry(*index, entry, normalizer, max_len)),
        );
        if let Some(pb) = &progress {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    rows
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} Formatting bodies [{bar:40}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

pub fn execute(
    file: &Path,
    criteria: &FilterCriteria,
    config: &EngineConfig,
    format: OutputFormat,
) -> Result<()> {
    let entries = load_entries(file)?;
    let total = entries.len();

    let selected: Vec<(usize, LogEntry)> = entries
        .into_iter()
        .enumerate()
        .filter(|(_, entry)| criteria.matches(entry))
        .collect();
    tracing::debug!("{} of {} entries selected", selected.len(), total);

    let normalizer = Normalizer::from_config(config);
    let rows = collect_rows(&selected, &normalizer, config.truncate_len);

    match format {
        OutputFormat::Json => output_json(&rows)?,
        OutputFormat::Table => output_table(&rows),
        OutputFormat::Pretty => output_pretty(&rows, total),
    }

    Ok(())
}

fn output_json(rows: &[EntryRow]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn output_pretty(rows: &[EntryRow], total: usize) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Entries ({} of {})", rows.len(), total))
            .bold()
            .cyan()
    );

    if rows.is_empty() {
        println!("  {}", style("No entries match the current filters").dim());
        println!();
        return;
    }

    for row in rows {
        let duration = row
            .duration
            .map(|d| format!("{}ms", d))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "\n{} {} {} {} {}",
            style(format!("[{}]", row.index)).dim(),
            style(&row.method).bold(),
            style(&row.status).yellow(),
            row.host,
            style(duration).dim()
        );
        print_body("Request", &row.request_body);
        print_body("Response", &row.response_body);
    }

    println!();
}

fn print_body(heading: &str, body: &str) {
    use console::style;

    if body.is_empty() {
        return;
    }
    println!("  {}:", style(heading).underlined());
    for line in body.lines() {
        println!("    {}", line);
    }
}

fn output_table(rows: &[EntryRow]) {
    println!("Index\tMethod\tStatus\tHost\tDuration\tRequest Body\tResponse Body");
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.index,
            row.method,
            row.status,
            row.host,
            row.duration.map(|d| d.to_string()).unwrap_or_default(),
            single_line(&row.request_body),
            single_line(&row.response_body)
        );
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> LogEntry {
        LogEntry::new(value)
    }

    #[test]
    fn test_row_defaults_missing_fields() {
        let row = EntryRow::from_entry(3, &entry(json!({})), &Normalizer::default(), 100);
        assert_eq!(row.index, 3);
        assert_eq!(row.method, "Unknown");
        assert_eq!(row.status, "Unknown");
        assert_eq!(row.host, "Unknown");
        assert_eq!(row.duration, None);
        assert_eq!(row.request_body, "");
    }

    #[test]
    fn test_row_decodes_and_truncates_bodies() {
        let e = entry(json!({
            "method": "POST",
            "request_body": "{\"a\": 1}",
            "response_body": "x".repeat(30),
        }));
        let row = EntryRow::from_entry(0, &e, &Normalizer::default(), 20);
        assert_eq!(row.request_body, "{\n  \"a\": 1\n}");
        assert_eq!(row.response_body, format!("{}...", "x".repeat(20)));
    }

    #[test]
    fn test_collect_rows_keeps_indices_across_chunks() {
        let entries: Vec<(usize, LogEntry)> = (0..120)
            .map(|i| (i * 2, entry(json!({"host": format!("h{}", i), "request_body": "{}"}))))
            .collect();
        let rows = collect_rows(&entries, &Normalizer::default(), 100);

        assert_eq!(rows.len(), 120);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[119].index, 238);
        assert_eq!(rows[60].host, "h60");
    }

    #[test]
    fn test_single_line_collapses_whitespace() {
        assert_eq!(single_line("{\n  \"a\": 1\n}"), "{ \"a\": 1 }");
    }
}
