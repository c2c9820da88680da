use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse log file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
