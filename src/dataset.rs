//! # Dataset Module
//!
//! Loads a listening-history CSV into memory and provides the cleaning
//! operations that run before analysis: missing-value inspection, filling
//! categorical gaps with a sentinel, summary information and random samples.
//!
//! The only failure treated as recoverable is a missing source file, which is
//! reported as [`DatasetError::NotFound`] so the caller can exit politely.
//! Everything else (broken CSV, unparseable timestamps) is fatal.

use crate::event::{Column, ListeningEvent, RawEvent};
use log::{debug, info, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or cleaning a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("File {} not found.", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column `{0}` is missing from the header")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Row(#[from] anyhow::Error),

    #[error("`{0}` is not a text column and cannot be filled")]
    NotFillable(String),
}

/// Columns every export must carry.
const REQUIRED_COLUMNS: [Column; 4] = [
    Column::Timestamp,
    Column::MsPlayed,
    Column::ArtistName,
    Column::Shuffle,
];

/// Summary shown by the explore menu.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub length: usize,
    pub columns: Vec<String>,
    /// Number of columns with at least one missing cell.
    pub total_missing_values: usize,
    pub data_types: Vec<(String, String)>,
}

/// The in-memory event table, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    events: Vec<ListeningEvent>,
}

impl Dataset {
    /// Read a CSV file from disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
            _ => DatasetError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let dataset = Self::from_reader(file)?;
        info!(
            "Loaded {} events ({} columns) from {}",
            dataset.len(),
            dataset.columns.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Read CSV from any reader. Unknown header columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns: Vec<Column> = headers.iter().filter_map(Column::from_name).collect();
        debug!("Recognized columns: {columns:?}");

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !columns.contains(c)) {
            return Err(DatasetError::MissingColumn(missing.name()));
        }

        let mut events = Vec::new();
        for (index, record) in csv_reader.deserialize::<RawEvent>().enumerate() {
            let raw = record?;
            events.push(ListeningEvent::from_raw(raw, index + 1)?);
        }

        Ok(Self { columns, events })
    }

    pub fn from_events(columns: Vec<Column>, events: Vec<ListeningEvent>) -> Self {
        Self { columns, events }
    }

    /// Table with the full export header.
    pub fn with_all_columns(events: Vec<ListeningEvent>) -> Self {
        Self::from_events(Column::ALL.to_vec(), events)
    }

    pub fn events(&self) -> &[ListeningEvent] {
        &self.events
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Missing cells per column, in header order.
    pub fn missing_counts(&self) -> Vec<(Column, usize)> {
        self.columns
            .iter()
            .map(|&column| {
                let count = self.events.iter().filter(|e| e.is_missing(column)).count();
                (column, count)
            })
            .collect()
    }

    pub fn has_missing(&self) -> bool {
        self.has_missing_in(&self.columns)
    }

    /// Whether any of `columns` has an empty cell.
    pub fn has_missing_in(&self, columns: &[Column]) -> bool {
        columns
            .iter()
            .any(|&column| self.events.iter().any(|e| e.is_missing(column)))
    }

    /// Fill empty cells of the given text columns with `sentinel`.
    ///
    /// Returns the number of cells written. The row count never changes.
    pub fn fill_missing(&mut self, columns: &[Column], sentinel: &str) -> Result<usize, DatasetError> {
        if let Some(column) = columns.iter().find(|c| !c.is_categorical()) {
            return Err(DatasetError::NotFillable(column.name().to_string()));
        }

        let mut filled = 0;
        for &column in columns {
            let mut column_filled = 0;
            for event in &mut self.events {
                if let Some(cell) = event.text_mut(column) {
                    if cell.is_none() {
                        *cell = Some(sentinel.to_string());
                        column_filled += 1;
                    }
                }
            }
            trace!("Filled {column_filled} cells in `{column}`");
            filled += column_filled;
        }

        info!("Filled {filled} missing values with `{sentinel}`");
        Ok(filled)
    }

    /// Resolve column names for [`Dataset::fill_missing`].
    pub fn parse_columns(names: &[String]) -> Result<Vec<Column>, DatasetError> {
        names
            .iter()
            .map(|name| Column::from_name(name).ok_or_else(|| DatasetError::NotFillable(name.clone())))
            .collect()
    }

    pub fn info(&self) -> DatasetInfo {
        let total_missing_values = self
            .missing_counts()
            .iter()
            .filter(|(_, count)| *count > 0)
            .count();

        DatasetInfo {
            length: self.len(),
            columns: self.columns.iter().map(|c| c.name().to_string()).collect(),
            total_missing_values,
            data_types: self
                .columns
                .iter()
                .map(|c| (c.name().to_string(), c.dtype().to_string()))
                .collect(),
        }
    }

    /// `n` distinct random rows, or every row when `n` exceeds the length.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<&ListeningEvent> {
        self.events.choose_multiple(rng, n).collect()
    }
}
