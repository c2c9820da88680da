use anyhow::{Context, Result, bail};
use charlog_core::analysis::DurationBucket;
use charlog_core::capture::{LogEntry, LogReader, ReconciledInput};
use charlog_core::filter::FilterCriteria;
use clap::Args;
use std::path::{Path, PathBuf};

pub const NO_DATA_MESSAGE: &str = "No data found or unsupported format";

/// Entry filters shared by the commands that work on entry lists
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only entries for this host (exact or glob like *.example.com; repeatable, comma-separated)
    #[arg(long = "host", value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Only entries with this status (e.g. 404, 2xx, 500-599, error)
    #[arg(long)]
    pub status: Option<String>,

    /// Only entries in this duration bucket (<100ms, 100-500ms, 500ms-1s, 1s-5s, >5s)
    #[arg(long)]
    pub duration: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let host_patterns: Vec<String> = self
            .hosts
            .iter()
            .flat_map(|h| h.split(',').map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect();

        let mut criteria = FilterCriteria::new();

        if !host_patterns.is_empty() {
            criteria = criteria.with_hosts(host_patterns)?;
        }

        if let Some(status) = &self.status {
            criteria = criteria.with_status(status)?;
        }

        if let Some(duration) = &self.duration {
            criteria = criteria.with_duration(duration.parse::<DurationBucket>()?);
        }

        Ok(criteria)
    }
}

/// Directory searched for capture files when none is configured
pub fn default_source_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("charles_output"))
}

/// Resolve a FILE argument.
///
/// Paths that exist as given win; otherwise a relative path is looked up in
/// the source directory. If neither exists the argument is returned as-is so
/// the load error names what the user typed.
pub fn resolve_input(file: &Path, source_dir: Option<&Path>) -> PathBuf {
    if file.is_absolute() || file.exists() {
        return file.to_path_buf();
    }

    let source_dir = source_dir.map(Path::to_path_buf).or_else(default_source_dir);
    match source_dir {
        Some(dir) if dir.join(file).exists() => {
            let resolved = dir.join(file);
            tracing::debug!("Resolved {} to {}", file.display(), resolved.display());
            resolved
        }
        _ => file.to_path_buf(),
    }
}

pub fn load_input(file: &Path) -> Result<ReconciledInput> {
    tracing::info!("Loading data from {}", file.display());
    LogReader::from_file(file).with_context(|| format!("Could not load {}", file.display()))
}

/// Load a file that must contain per-entry records
pub fn load_entries(file: &Path) -> Result<Vec<LogEntry>> {
    match load_input(file)? {
        ReconciledInput::EntryList(entries) => Ok(entries),
        ReconciledInput::Summary(_) => bail!(
            "{} is a summary file. It contains statistics but no detailed entries.",
            file.display()
        ),
        ReconciledInput::Empty => bail!("{}: {}", NO_DATA_MESSAGE, file.display()),
    }
}

pub fn file_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
