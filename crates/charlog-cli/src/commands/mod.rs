pub mod completion;
pub mod entries;
pub mod input;
pub mod report;
pub mod show;
pub mod stats;
