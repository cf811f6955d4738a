//! # Streamstat
//!
//! Loads a listening-history CSV and either opens the interactive menu or
//! runs the analysis named on the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive menu
//! streamstat --data spotify_history.csv
//!
//! # One-shot analyses
//! streamstat listening artist-time --top 15
//! streamstat temporal year-over-year --json
//! streamstat report
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::io::{self, Write};
use std::process::ExitCode;
use streamstat::cli::{self, Command};
use streamstat::config::RuntimeConfig;
use streamstat::dataset::{Dataset, DatasetError};
use streamstat::menu::Shell;
use streamstat::session::Session;
use streamstat::{completion, session};

/// Resolve configuration: file first, then command-line overrides.
fn resolve_config(args: &cli::Args) -> Result<RuntimeConfig> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::load()?,
    };

    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    if let Some(top) = args.top {
        config.top_n = top;
    }

    debug!("Resolved config: {config:?}");
    Ok(config)
}

/// Main entry point for streamstat.
///
/// A missing dataset file is the one failure handled here: it prints a
/// message and exits with status 1. Other errors propagate and are printed
/// by `anyhow`.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug streamstat report` - Enable debug logging
/// - `RUST_LOG=streamstat::analysis=trace streamstat menu` - Module-specific logging
fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = cli::Args::parse();

    if let Some(Command::Completion { shell }) = args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(
            completion::shell_to_completion_shell(shell),
            &mut cmd,
            &mut io::stdout(),
        );
        return Ok(ExitCode::SUCCESS);
    }

    let config = resolve_config(&args)?;
    let data_path = config.absolute_data_path();
    info!("Loading dataset from {}", data_path.display());

    let dataset = match Dataset::load(&data_path) {
        Ok(dataset) => dataset,
        Err(DatasetError::NotFound(path)) => {
            eprintln!("File {} not found.", path.display());
            eprintln!("Error: Dataset could not be loaded or is empty.");
            eprintln!("Pass a CSV with --data or set STREAMSTAT_DATA.");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if dataset.is_empty() {
        eprintln!("Error: Dataset could not be loaded or is empty.");
        return Ok(ExitCode::FAILURE);
    }

    let mut session = Session::new(dataset, config).with_json(args.json);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        None | Some(Command::Menu) => {
            let stdin = io::stdin();
            let mut shell = Shell::new(stdin.lock(), out);
            shell.run(&mut session)?;
        }
        Some(Command::Sample { count }) => session.show_sample(count, &mut out)?,
        Some(Command::Fill { columns }) => {
            let filled = session.fill_missing(&columns)?;
            writeln!(out, "Filled {filled} missing values.")?;
            session.perform(session::Analysis::MissingValues, &mut out)?;
        }
        Some(Command::Report) => {
            session.auto_fill()?;
            session.report(&mut out)?;
        }
        Some(command) => {
            if let Some(analysis) = command.analysis() {
                if analysis.needs_clean_data() {
                    session.auto_fill()?;
                }
                session.perform(analysis, &mut out)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
