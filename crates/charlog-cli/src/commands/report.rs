use super::input::{NO_DATA_MESSAGE, load_input};
use anyhow::{Result, bail};
use charlog_core::EngineConfig;
use charlog_core::report::{ReportMeta, ReportRenderer, ReportWriter, build_report};
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_NAME: &str = "charles_log_report.html";

/// Where the report goes when no output path is given
pub fn default_output() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_REPORT_NAME)
}

/// Load `file`, render its HTML report and write it to `output`
pub fn generate_report(file: &Path, output: &Path, config: &EngineConfig) -> Result<PathBuf> {
    let input = load_input(file)?;

    let meta = ReportMeta::for_source(file);
    let renderer = ReportRenderer::from_config(config);

    let Some(document) = build_report(&input, &meta, &renderer) else {
        bail!("{}: {}", NO_DATA_MESSAGE, file.display());
    };

    ReportWriter::write(output, &document)?;
    Ok(output.to_path_buf())
}

pub fn execute(file: &Path, output: Option<PathBuf>, config: &EngineConfig) -> Result<()> {
    let output = output.unwrap_or_else(default_output);
    tracing::debug!("Generating {} report for {}", output.display(), file.display());

    let report_path = generate_report(file, &output, config)?;
    println!("Report generated at: {}", report_path.display());

    Ok(())
}
