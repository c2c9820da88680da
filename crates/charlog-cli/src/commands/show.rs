use super::input::load_entries;
use crate::OutputFormat;
use anyhow::Result;
use charlog_core::capture::{LogEntry, UNKNOWN_LABEL};
use charlog_core::normalize::{Normalizer, pretty_full, render_pretty};
use charlog_core::{EngineConfig, Error};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

const NO_REQUEST_BODY: &str = "No request body data available.";
const NO_RESPONSE_BODY: &str = "No response body data available.";

/// Everything known about a single entry, bodies fully decoded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDetail {
    pub index: usize,
    pub method: String,
    pub status: String,
    pub host: String,
    pub duration: Option<f64>,
    pub request_body: String,
    pub response_body: String,
    /// The entry with every nested JSON string decoded
    pub entry: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
}

pub fn entry_detail(
    entries: &[LogEntry],
    index: usize,
    normalizer: &Normalizer,
) -> charlog_core::Result<EntryDetail> {
    let entry = entries.get(index).ok_or_else(|| {
        Error::EntryNotFound(format!(
            "index {} is out of range ({} entries)",
            index,
            entries.len()
        ))
    })?;

    let label = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN_LABEL.to_string());
    let normalized = normalizer.normalize_contained(entry.as_value());

    Ok(EntryDetail {
        index,
        method: label(entry.method()),
        status: label(entry.status()),
        host: label(entry.host()),
        duration: entry.duration_ms(),
        request_body: pretty_full(entry.request_body(), normalizer),
        response_body: pretty_full(entry.response_body(), normalizer),
        entry: normalized.value,
        advisories: normalized.advisories.iter().map(ToString::to_string).collect(),
    })
}

pub fn execute(file: &Path, index: usize, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let entries = load_entries(file)?;
    let normalizer = Normalizer::from_config(config);
    let detail = entry_detail(&entries, index, &normalizer)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&detail)?),
        OutputFormat::Table => output_table(&detail),
        OutputFormat::Pretty => output_pretty(&detail),
    }

    Ok(())
}

fn output_pretty(detail: &EntryDetail) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Entry #{}", detail.index)).bold().cyan()
    );
    println!("  Method:   {}", detail.method);
    println!("  Status:   {}", style(&detail.status).yellow());
    println!("  Host:     {}", detail.host);
    match detail.duration {
        Some(ms) => println!("  Duration: {}ms", ms),
        None => println!("  Duration: {}", style("-").dim()),
    }

    println!("\n{}", style("Request Body").bold());
    print_body(&detail.request_body, NO_REQUEST_BODY);

    println!("\n{}", style("Response Body").bold());
    print_body(&detail.response_body, NO_RESPONSE_BODY);

    println!("\n{}", style("Full Entry").bold());
    println!("{}", render_pretty(&detail.entry));

    for advisory in &detail.advisories {
        println!("\n{} {}", style("!").yellow().bold(), advisory);
    }

    println!();
}

fn print_body(body: &str, placeholder: &str) {
    if body.is_empty() {
        println!("  {}", console::style(placeholder).dim());
    } else {
        println!("{}", body);
    }
}

fn output_table(detail: &EntryDetail) {
    println!("Field\tValue");
    println!("Index\t{}", detail.index);
    println!("Method\t{}", detail.method);
    println!("Status\t{}", detail.status);
    println!("Host\t{}", detail.host);
    println!(
        "Duration\t{}",
        detail.duration.map(|d| d.to_string()).unwrap_or_default()
    );
    println!("Request Body\t{}", compact(&detail.request_body));
    println!("Response Body\t{}", compact(&detail.response_body));
}

fn compact(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join(" ")
}
