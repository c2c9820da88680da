use clap::ValueEnum;

pub mod commands;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Table,
}
