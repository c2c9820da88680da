mod html;
mod writer;

pub use html::{ReportRenderer, escape_html};
pub use writer::ReportWriter;

use crate::analysis::{AggregateResult, aggregate};
use crate::capture::{LogEntry, ReconciledInput, Summary};
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Charles Proxy Log Analysis";

/// What a report is built from
#[derive(Debug, Clone, Copy)]
pub enum ReportBody<'a> {
    Summary(&'a Summary),
    Detailed {
        entries: &'a [LogEntry],
        aggregate: &'a AggregateResult,
    },
}

/// Header information printed above the tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub title: String,
    pub generated_at: String,
    pub source_name: String,
}

impl ReportMeta {
    pub fn new(generated_at: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at: generated_at.into(),
            source_name: source_name.into(),
        }
    }

    /// Stamp the current local time and take the file name of `source`
    pub fn for_source(source: &Path) -> Self {
        let generated_at = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.display().to_string());
        Self::new(generated_at, source_name)
    }
}

/// Render the report for a reconciled input.
///
/// Returns `None` for [`ReconciledInput::Empty`]; there is nothing to show.
pub fn build_report(
    input: &ReconciledInput,
    meta: &ReportMeta,
    renderer: &ReportRenderer,
) -> Option<String> {
    match input {
        ReconciledInput::Summary(summary) => {
            Some(renderer.render(ReportBody::Summary(summary), meta))
        }
        ReconciledInput::EntryList(entries) => {
            let aggregate = aggregate(entries);
            Some(renderer.render(
                ReportBody::Detailed {
                    entries,
                    aggregate: &aggregate,
                },
                meta,
            ))
        }
        ReconciledInput::Empty => None,
    }
}
