//! # Command-Line Interface Module
//!
//! Clap derive definitions for streamstat. Without a subcommand the
//! interactive menu starts; each subcommand runs one analysis and exits.
//!
//! ## Examples
//!
//! ```bash
//! streamstat --data history.csv
//! streamstat --data history.csv listening skips
//! streamstat --json temporal year-over-year
//! streamstat report --top 5
//! ```

use crate::session::Analysis;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "streamstat")]
#[command(about = "Streamstat: listening-history analysis - skip rates, peak hours & platform usage")]
#[command(version)]
pub struct Args {
    /// Listening-history CSV to analyse
    ///
    /// Overrides `data_path` from the config file.
    #[arg(short, long, global = true, env = "STREAMSTAT_DATA", value_hint = clap::ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Number of entries in top-N charts
    #[arg(short, long, global = true)]
    pub top: Option<usize>,

    /// Print reports as JSON instead of charts
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this config file instead of the standard location
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute (interactive menu when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the interactive menu
    Menu,

    /// Show row count, columns, missing-value count and column types
    Info,

    /// Print random rows from the dataset
    Sample {
        /// How many rows to print
        #[arg(default_value = "5")]
        count: usize,
    },

    /// Chart missing values per column
    Missing,

    /// Fill missing text values with the sentinel and show what remains
    Fill {
        /// Columns to fill (defaults to `fill_columns` from the config)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Listening behavior analyses
    Listening {
        #[command(subcommand)]
        analysis: ListeningCommand,
    },

    /// Temporal trend analyses
    Temporal {
        #[command(subcommand)]
        analysis: TemporalCommand,
    },

    /// Interaction pattern analyses
    Interaction {
        #[command(subcommand)]
        analysis: InteractionCommand,
    },

    /// Run every analysis in sequence
    Report,

    /// Generate shell completions
    ///
    /// Usage: streamstat completion bash > ~/.local/share/bash-completion/completions/streamstat
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ListeningCommand {
    /// Total listening time by artist
    ArtistTime,
    /// Peak listening hours and days
    Peak,
    /// Most played artists by plays and by time
    MostPlayed,
    /// Skip rates overall, by artist and by hour
    Skips,
    /// Platform usage distribution
    Platforms,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum TemporalCommand {
    /// Monthly and yearly listening time
    Patterns,
    /// Hour-of-day listening frequency
    Hourly,
    /// Year-over-year listening behavior changes
    YearOverYear,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum InteractionCommand {
    /// Shuffle vs non-shuffle listening
    Shuffle,
    /// Reasons for track start and end
    Reasons,
}

impl From<ListeningCommand> for Analysis {
    fn from(command: ListeningCommand) -> Self {
        match command {
            ListeningCommand::ArtistTime => Analysis::ArtistListeningTime,
            ListeningCommand::Peak => Analysis::PeakListeningTimes,
            ListeningCommand::MostPlayed => Analysis::MostPlayedArtists,
            ListeningCommand::Skips => Analysis::SkipRates,
            ListeningCommand::Platforms => Analysis::PlatformUsage,
        }
    }
}

impl From<TemporalCommand> for Analysis {
    fn from(command: TemporalCommand) -> Self {
        match command {
            TemporalCommand::Patterns => Analysis::ListeningPatterns,
            TemporalCommand::Hourly => Analysis::HourlyListening,
            TemporalCommand::YearOverYear => Analysis::YearOverYear,
        }
    }
}

impl From<InteractionCommand> for Analysis {
    fn from(command: InteractionCommand) -> Self {
        match command {
            InteractionCommand::Shuffle => Analysis::ShuffleListening,
            InteractionCommand::Reasons => Analysis::TrackStartEndReasons,
        }
    }
}

impl Command {
    /// The single analysis this command runs, if any.
    pub fn analysis(&self) -> Option<Analysis> {
        match self {
            Command::Info => Some(Analysis::DatasetInfo),
            Command::Missing => Some(Analysis::MissingValues),
            Command::Listening { analysis } => Some((*analysis).into()),
            Command::Temporal { analysis } => Some((*analysis).into()),
            Command::Interaction { analysis } => Some((*analysis).into()),
            _ => None,
        }
    }
}
