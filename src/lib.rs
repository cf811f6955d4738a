//! Exploratory analysis of a personal music-streaming history.
//!
//! Core modules:
//! - [`event`] - One listening event and its derived temporal fields
//! - [`dataset`] - CSV loading and cleaning
//! - [`analysis`] - Group-by engine and the three analyzers
//! - [`session`] - Runs analyses against a loaded table
//! - [`menu`] - Interactive numbered menu
//!
//! ### Supporting Modules
//!
//! - [`render`] - Console charts and JSON output
//! - [`config`] - Configuration file and defaults
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use streamstat::analysis::{listening, temporal};
//! use streamstat::dataset::Dataset;
//! use streamstat::event::Column;
//! use std::path::Path;
//!
//! let mut dataset = Dataset::load(Path::new("data/csv/spotify_history.csv"))?;
//! dataset.fill_missing(&[Column::ReasonStart, Column::ReasonEnd], "unknown")?;
//!
//! let minutes = listening::artist_listening_time(dataset.events()).head(10);
//! for (artist, value) in minutes.entries() {
//!     println!("{artist}: {value:.1} min");
//! }
//!
//! let yoy = temporal::year_over_year(dataset.events());
//! println!("{} years of history", yoy.yearly_metrics.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Derived Metrics
//!
//! - **Listening time**: sum of `ms_played` divided by 60 000
//! - **Skip rate**: share of plays flagged as skipped, in percent
//! - **Percent of total**: group count over the row count of the whole table
//! - **Year-over-year change**: percent delta against the preceding year,
//!   undefined for the first year
//!
//! ## Error Handling
//!
//! Loading returns [`dataset::DatasetError`]; a missing file is its own
//! variant so the binary can exit with a plain message. Everything else
//! returns `anyhow::Result`.

pub mod analysis;
pub mod cli;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod event;
pub mod menu;
pub mod render;
pub mod session;
