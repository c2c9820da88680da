mod reader;
mod reconcile;
mod types;

pub use reader::LogReader;
pub use reconcile::{ReconciledInput, reconcile};
pub use types::*;
