//! mcastsim CLI - multicast tree resilience experiments.
//!
//! Commands:
//! - `mcastsim run` - Run trials and write the results document
//! - `mcastsim summarize` - Print statistics for a results document

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mcastsim")]
#[command(about = "Monte-Carlo evaluation of redundant multicast trees under failures")]
#[command(version)]
struct Cli {
    /// Log level, e.g. `--debug=trace`; a bare flag means `debug`
    #[arg(
        short,
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_value = "info",
        default_missing_value = "debug"
    )]
    debug: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an experiment
    Run(commands::run::RunArgs),

    /// Print per-heuristic statistics of a results file
    Summarize {
        /// Path to a results JSON file
        results: PathBuf,

        /// Also export the results as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.debug)
        .with_context(|| format!("Invalid log level: {}", cli.debug))?;
    if cli.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match cli.command {
        Commands::Run(args) => commands::run::run(&args),
        Commands::Summarize { results, csv } => commands::summarize::run(&results, csv.as_deref()),
    }
}
