pub mod analysis;
pub mod capture;
pub mod config;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod report;

pub use config::EngineConfig;
pub use error::{Error, Result};
