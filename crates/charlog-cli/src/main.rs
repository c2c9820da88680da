use anyhow::Result;
use charlog_cli::OutputFormat;
use charlog_cli::commands;
use charlog_cli::commands::input::{FilterArgs, resolve_input};
use charlog_core::EngineConfig;
use charlog_core::config::{DEFAULT_MAX_DEPTH, DEFAULT_TOP_HOSTS, DEFAULT_TRUNCATE_LEN};
use charlog_core::normalize::MAX_DEPTH_CEILING;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "charlog")]
#[command(author, version)]
#[command(
    about = "Analyze Charles proxy session logs and render HTML reports",
    long_about = "charlog reads JSON logs exported from Charles proxy sessions, either \
                  per-request entry lists or pre-aggregated summaries, and turns them into \
                  traffic statistics, decoded request/response bodies and static HTML reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// How many levels of JSON-encoded strings to decode in bodies
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH, value_parser = parse_depth)]
    depth: usize,

    /// Directory searched for log files given by bare name
    #[arg(long, global = true, env = "CHARLES_OUTPUT_DIR", value_name = "DIR")]
    source_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a standalone HTML report for a log file
    Report {
        /// Path to the log file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the report (defaults to charles_log_report.html in the temp directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display traffic statistics
    Stats {
        /// Path to the log file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Number of hosts to rank
        #[arg(long, default_value_t = DEFAULT_TOP_HOSTS)]
        top: usize,
    },

    /// List entries with truncated body previews
    Entries {
        /// Path to the log file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum characters shown per body preview
        #[arg(long, default_value_t = DEFAULT_TRUNCATE_LEN)]
        truncate: usize,
    },

    /// Show one entry with fully decoded bodies
    Show {
        /// Path to the log file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Position of the entry in the log (0-based)
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for charlog.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        charlog completion --shell bash > ~/.local/share/bash-completion/completions/charlog
        # or add to ~/.bashrc:
        eval \"$(charlog completion --shell bash)\"

    Zsh:
        charlog completion --shell zsh > ~/.zfunc/_charlog
        # then in ~/.zshrc, before compinit:
        fpath=(~/.zfunc $fpath)

    Fish:
        charlog completion --shell fish > ~/.config/fish/completions/charlog.fish

    PowerShell:
        charlog completion --shell powershell >> $PROFILE")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = EngineConfig::new().with_max_depth(cli.depth);
    let resolve = |file: &PathBuf| resolve_input(file, cli.source_dir.as_deref());

    match cli.command {
        Commands::Report { file, output } => {
            commands::report::execute(&resolve(&file), output, &config)
        }
        Commands::Stats { file, filters, top } => commands::stats::execute(
            &resolve(&file),
            &filters.criteria()?,
            &config.with_top_hosts(top),
            cli.format,
        ),
        Commands::Entries {
            file,
            filters,
            truncate,
        } => commands::entries::execute(
            &resolve(&file),
            &filters.criteria()?,
            &config.with_truncate_len(truncate),
            cli.format,
        ),
        Commands::Show { file, index } => {
            commands::show::execute(&resolve(&file), index, &config, cli.format)
        }
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn parse_depth(value: &str) -> std::result::Result<usize, String> {
    let depth: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative number", value))?;
    if depth > MAX_DEPTH_CEILING {
        return Err(format!("depth must be at most {}", MAX_DEPTH_CEILING));
    }
    Ok(depth)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("charlog=debug,charlog_cli=debug,charlog_core=debug")
    } else {
        EnvFilter::new("charlog=info,charlog_cli=info,charlog_core=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
