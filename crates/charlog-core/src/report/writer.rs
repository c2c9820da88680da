use crate::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub struct ReportWriter;

impl ReportWriter {
    /// Write a rendered document to `path`.
    ///
    /// The document goes to a temporary file next to the destination and is
    /// renamed into place, so an existing report is either fully replaced or
    /// left untouched.
    pub fn write(path: &Path, document: &str) -> Result<()> {
        tracing::debug!("Writing report to: {}", path.display());

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(document.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path)?;

        tracing::info!(
            "Wrote {} byte report to {}",
            document.len(),
            path.display()
        );

        Ok(())
    }
}
