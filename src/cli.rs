use crate::commands;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Printed when the tool runs without a subcommand.
pub const NOTICE: &str = "Script template created. Manual review required for each file.";

#[derive(Parser, Debug)]
#[command(
    name = "api-client-migrate",
    version,
    about = "Migrate legacy fetch('/api/...') calls to the shared API client"
)]
struct Cli {
    /// Increase verbosity (-v, -vv). Uses RUST_LOG under the hood
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the active pattern table
    Patterns {
        /// Path to api-migrate.toml (defaults to current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Report what would be rewritten without touching any file
    Scan {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory to scan (overrides `root` from the config)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rewrite files in place
    Apply {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        root: Option<PathBuf>,
        /// Write changes without confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    // try_init: run_cli_with may be called more than once in one process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Main CLI entry point
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

/// CLI entry point with explicit arguments (first item is the program name)
pub fn run_cli_with<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    run(Cli::try_parse_from(args)?)
}

fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    match cli.command {
        None => println!("{}", NOTICE),
        Some(Commands::Patterns { config }) => commands::patterns(config.as_deref())?,
        Some(Commands::Scan { config, root, json }) => {
            commands::scan(config.as_deref(), root.as_deref(), json)?
        }
        Some(Commands::Apply { config, root, yes }) => {
            commands::apply(config.as_deref(), root.as_deref(), yes)?
        }
    }

    Ok(())
}
