use super::{ReportBody, ReportMeta};
use crate::analysis::{AggregateResult, TimingStats};
use crate::capture::{LogEntry, Summary};
use crate::config::{DEFAULT_REPORT_HOSTS, EngineConfig};
use std::borrow::Cow;

const STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 20px; }
        h1, h2, h3 { color: #333; }
        table { border-collapse: collapse; width: 100%; margin-bottom: 20px; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
        tr:nth-child(even) { background-color: #f9f9f9; }
"#;

/// Renders a self-contained HTML report.
///
/// Output depends only on the inputs: the same body and meta always give
/// the same document.
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    host_limit: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_HOSTS)
    }
}

impl ReportRenderer {
    pub fn new(host_limit: usize) -> Self {
        Self { host_limit }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.report_hosts)
    }

    pub fn render(&self, body: ReportBody<'_>, meta: &ReportMeta) -> String {
        let mut html = String::with_capacity(4096);

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("    <meta charset=\"utf-8\">\n");
        html.push_str(&format!(
            "    <title>{}</title>\n",
            escape_html(&meta.title)
        ));
        html.push_str("    <style>\n");
        html.push_str(STYLE);
        html.push_str("    </style>\n</head>\n<body>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", escape_html(&meta.title)));
        html.push_str(&format!(
            "<p>Generated on: {}</p>\n",
            escape_html(&meta.generated_at)
        ));
        html.push_str(&format!("<p>File: {}</p>\n", escape_html(&meta.source_name)));

        match body {
            ReportBody::Summary(summary) => self.summary_section(&mut html, summary),
            ReportBody::Detailed { entries, aggregate } => {
                self.detailed_section(&mut html, entries, aggregate)
            }
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn summary_section(&self, html: &mut String, summary: &Summary) {
        html.push_str("<h2>Summary</h2>\n");
        html.push_str(&format!(
            "<p>Total Entries: {}</p>\n",
            summary.total_entries
        ));

        if let Some(methods) = &summary.request_methods {
            count_table(html, "Request Methods", "Method", &methods.by_count_desc());
        }
        if let Some(statuses) = &summary.status_codes {
            count_table(html, "Status Codes", "Status", &statuses.by_status_code());
        }
        if let Some(hosts) = &summary.hosts {
            count_table(html, "Top Hosts", "Host", &hosts.most_common(self.host_limit));
        }
        if let Some(timing) = &summary.timing {
            timing_table(html, timing, timing.avg.to_string());
        }
    }

    fn detailed_section(&self, html: &mut String, entries: &[LogEntry], aggregate: &AggregateResult) {
        html.push_str("<h2>Detailed Report</h2>\n");
        html.push_str(&format!("<p>Total Entries: {}</p>\n", entries.len()));

        count_table(
            html,
            "Status Codes",
            "Status",
            &aggregate.status_counts.by_status_code(),
        );
        count_table(
            html,
            "Top Hosts",
            "Host",
            &aggregate.host_counts.most_common(self.host_limit),
        );
        count_table(
            html,
            "Request Methods",
            "Method",
            &aggregate.method_counts.by_count_desc(),
        );

        if let Some(timing) = &aggregate.timing {
            timing_table(html, timing, format!("{:.2}", timing.avg));
        }
    }
}

fn count_table(html: &mut String, heading: &str, label_header: &str, rows: &[(&str, u64)]) {
    html.push_str(&format!("<h3>{}</h3>\n<table>\n", heading));
    html.push_str(&format!(
        "<tr><th>{}</th><th>Count</th></tr>\n",
        label_header
    ));
    for (label, count) in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(label),
            count
        ));
    }
    html.push_str("</table>\n");
}

fn timing_table(html: &mut String, timing: &TimingStats, average: String) {
    html.push_str("<h3>Timing (ms)</h3>\n<table>\n");
    html.push_str("<tr><th>Metric</th><th>Value</th></tr>\n");
    let rows = [
        ("Minimum", timing.min.to_string()),
        ("Maximum", timing.max.to_string()),
        ("Average", average),
        ("Total", timing.total.to_string()),
    ];
    for (metric, value) in rows {
        html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", metric, value));
    }
    html.push_str("</table>\n");
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
