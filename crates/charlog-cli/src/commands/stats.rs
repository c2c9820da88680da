use super::input::{NO_DATA_MESSAGE, file_name, load_input};
use crate::OutputFormat;
use anyhow::{Result, bail};
use charlog_core::EngineConfig;
use charlog_core::analysis::{
    AggregateResult, Analyzer, BucketCounts, HostStatusAnalyzer, HostStatusMatrix, StatusClass,
    Tally, TimingStats, aggregate,
};
use charlog_core::capture::{ReconciledInput, Summary};
use charlog_core::filter::{FilterCriteria, FilterOptions, filter_entries};
use serde::Serialize;
use std::path::Path;

/// Statistics for one capture file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatsReport {
    Summary {
        file_name: String,
        summary: Summary,
    },
    Entries(EntryStats),
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryStats {
    pub file_name: String,
    pub total_entries: usize,
    pub filtered_entries: usize,
    pub aggregate: AggregateResult,
    pub duration_buckets: BucketCounts,
    pub host_status: HostStatusMatrix,
    pub filter_options: FilterOptions,
}

/// Load a capture file and compute its statistics.
///
/// Filters narrow entry lists before aggregation; summary files carry no
/// entries, so filters do not apply to them.
pub fn collect_stats(
    file: &Path,
    criteria: &FilterCriteria,
    config: &EngineConfig,
) -> Result<StatsReport> {
    let file_name = file_name(file);

    match load_input(file)? {
        ReconciledInput::Summary(summary) => {
            if !criteria.is_empty() {
                tracing::warn!("Filters are ignored for summary files");
            }
            Ok(StatsReport::Summary { file_name, summary })
        }
        ReconciledInput::EntryList(entries) => {
            let filtered = filter_entries(&entries, criteria);
            let aggregate = aggregate(&filtered);

            Ok(StatsReport::Entries(EntryStats {
                file_name,
                total_entries: entries.len(),
                filtered_entries: filtered.len(),
                duration_buckets: aggregate.duration_buckets(),
                host_status: HostStatusAnalyzer::new(config.top_hosts).analyze(&filtered),
                filter_options: FilterOptions::from_entries(&entries),
                aggregate,
            }))
        }
        ReconciledInput::Empty => bail!("{}: {}", NO_DATA_MESSAGE, file.display()),
    }
}

pub fn execute(
    file: &Path,
    criteria: &FilterCriteria,
    config: &EngineConfig,
    format: OutputFormat,
) -> Result<()> {
    tracing::debug!("Computing statistics for {}", file.display());

    let report = collect_stats(file, criteria, config)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report, config),
        OutputFormat::Pretty => output_pretty(&report, config),
    }

    Ok(())
}

fn output_json(report: &StatsReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_pretty(report: &StatsReport, config: &EngineConfig) {
    use console::style;

    match report {
        StatsReport::Summary { file_name, summary } => {
            println!(
                "\n{}",
                style(format!("Log Summary: {}", file_name)).bold().cyan()
            );
            println!(
                "  {}",
                style("Summary file: statistics only, no detailed entries").dim()
            );
            println!(
                "\n  Total Entries: {}",
                style(summary.total_entries).yellow()
            );

            if let Some(methods) = &summary.request_methods {
                print_counts("Request Methods", &methods.by_count_desc(), false);
            }
            if let Some(hosts) = &summary.hosts {
                print_counts(
                    &format!("Top {} Hosts", config.top_hosts),
                    &hosts.most_common(config.top_hosts),
                    false,
                );
            }
            if let Some(statuses) = &summary.status_codes {
                print_counts("Status Codes", &statuses.by_status_code(), true);
            }
            if let Some(timing) = &summary.timing {
                print_timing(timing);
            }
        }
        StatsReport::Entries(stats) => {
            println!(
                "\n{}",
                style(format!("Log Summary: {}", stats.file_name))
                    .bold()
                    .cyan()
            );
            println!(
                "\n  Total Entries:    {}",
                style(stats.total_entries).yellow()
            );
            if stats.filtered_entries != stats.total_entries {
                println!(
                    "  Filtered Entries: {}",
                    style(stats.filtered_entries).yellow()
                );
            }

            let aggregate = &stats.aggregate;
            print_counts("Status Codes", &aggregate.status_counts.by_status_code(), true);
            print_counts(
                &format!("Top {} Hosts", config.top_hosts),
                &aggregate.host_counts.most_common(config.top_hosts),
                false,
            );
            print_counts("Request Methods", &aggregate.method_counts.by_count_desc(), false);

            match &aggregate.timing {
                Some(timing) => {
                    print_timing(timing);
                    println!("\n{}", style("Duration Categories").bold());
                    for (bucket, count) in stats.duration_buckets.iter() {
                        println!("  {:<12} {}", bucket.label(), count);
                    }
                }
                None => println!("\n  {}", style("No duration data available").dim()),
            }

            print_host_status(&stats.host_status);
        }
    }

    println!();
}

fn print_counts(heading: &str, rows: &[(&str, u64)], colour_status: bool) {
    use console::style;

    println!("\n{}", style(heading).bold());
    if rows.is_empty() {
        println!("  {}", style("none").dim());
        return;
    }

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, count) in rows {
        let padded = format!("{:<width$}", label, width = width);
        let label = if colour_status {
            match StatusClass::of(label) {
                StatusClass::Informational => style(padded).cyan(),
                StatusClass::Success => style(padded).green(),
                StatusClass::Redirection => style(padded).blue(),
                StatusClass::ClientError => style(padded).yellow(),
                StatusClass::ServerError => style(padded).red(),
                StatusClass::Other => style(padded).dim(),
            }
        } else {
            style(padded)
        };
        println!("  {}  {}", label, count);
    }
}

fn print_timing(timing: &TimingStats) {
    use console::style;

    println!("\n{}", style("Timing (ms)").bold());
    println!("  Minimum:  {}", timing.min);
    println!("  Maximum:  {}", timing.max);
    println!("  Average:  {:.2}", timing.avg);
    println!("  Total:    {}", timing.total);
}

fn print_host_status(matrix: &HostStatusMatrix) {
    use console::style;

    if matrix.is_empty() {
        return;
    }

    println!("\n{}", style("Status Codes by Host").bold());
    let host_width = matrix.hosts.iter().map(|h| h.len()).max().unwrap_or(4).max(4);
    let mut header = format!("  {:<host_width$}", "Host", host_width = host_width);
    for status in &matrix.statuses {
        header.push_str(&format!(" {:>6}", status));
    }
    println!("{}", style(header).dim());

    for (host, row) in matrix.hosts.iter().zip(&matrix.counts) {
        let mut line = format!("  {:<host_width$}", host, host_width = host_width);
        for count in row {
            line.push_str(&format!(" {:>6}", count));
        }
        println!("{}", line);
    }
}

fn output_table(report: &StatsReport, config: &EngineConfig) {
    println!("Section,Label,Value");

    match report {
        StatsReport::Summary { file_name, summary } => {
            println!("File,,{}", file_name);
            println!("Total Entries,,{}", summary.total_entries);
            if let Some(methods) = &summary.request_methods {
                table_rows("Method", methods, |t| t.by_count_desc());
            }
            if let Some(statuses) = &summary.status_codes {
                table_rows("Status", statuses, |t| t.by_status_code());
            }
            if let Some(hosts) = &summary.hosts {
                table_rows("Host", hosts, |t| t.most_common(config.top_hosts));
            }
            if let Some(timing) = &summary.timing {
                table_timing(timing);
            }
        }
        StatsReport::Entries(stats) => {
            println!("File,,{}", stats.file_name);
            println!("Total Entries,,{}", stats.total_entries);
            println!("Filtered Entries,,{}", stats.filtered_entries);
            let aggregate = &stats.aggregate;
            table_rows("Status", &aggregate.status_counts, |t| t.by_status_code());
            table_rows("Host", &aggregate.host_counts, |t| {
                t.most_common(config.top_hosts)
            });
            table_rows("Method", &aggregate.method_counts, |t| t.by_count_desc());
            if let Some(timing) = &aggregate.timing {
                table_timing(timing);
                for (bucket, count) in stats.duration_buckets.iter() {
                    println!("Duration,{},{}", bucket.label(), count);
                }
            }
        }
    }
}

fn table_rows<'a>(section: &str, tally: &'a Tally, order: impl Fn(&'a Tally) -> Vec<(&'a str, u64)>) {
    for (label, count) in order(tally) {
        println!("{},{},{}", section, csv_field(label), count);
    }
}

fn table_timing(timing: &TimingStats) {
    println!("Timing,Minimum,{}", timing.min);
    println!("Timing,Maximum,{}", timing.max);
    println!("Timing,Average,{:.2}", timing.avg);
    println!("Timing,Total,{}", timing.total);
}

/// Quote a value if it would break the comma-separated layout
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quotes_separators() {
        assert_eq!(csv_field("a.com"), "a.com");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
