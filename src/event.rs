//! # Listening Event Module
//!
//! One row of a streaming-history export. Rows are read from CSV as
//! [`RawEvent`] (every cell as text, empty cells as `None`) and converted into
//! a typed [`ListeningEvent`], which is where the timestamp is parsed and the
//! derived temporal fields (hour, day, month, year) are attached.
//!
//! The derived fields are private and only ever computed from the timestamp,
//! so they cannot drift out of sync with it.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every column the loader understands, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    TrackUri,
    Timestamp,
    Platform,
    MsPlayed,
    TrackName,
    ArtistName,
    AlbumName,
    ReasonStart,
    ReasonEnd,
    Shuffle,
    Skipped,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::TrackUri,
        Column::Timestamp,
        Column::Platform,
        Column::MsPlayed,
        Column::TrackName,
        Column::ArtistName,
        Column::AlbumName,
        Column::ReasonStart,
        Column::ReasonEnd,
        Column::Shuffle,
        Column::Skipped,
    ];

    /// Header name as it appears in the CSV file
    pub const fn name(self) -> &'static str {
        match self {
            Column::TrackUri => "spotify_track_uri",
            Column::Timestamp => "ts",
            Column::Platform => "platform",
            Column::MsPlayed => "ms_played",
            Column::TrackName => "track_name",
            Column::ArtistName => "artist_name",
            Column::AlbumName => "album_name",
            Column::ReasonStart => "reason_start",
            Column::ReasonEnd => "reason_end",
            Column::Shuffle => "shuffle",
            Column::Skipped => "skipped",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name.trim())
    }

    /// Type label shown by `info`
    pub const fn dtype(self) -> &'static str {
        match self {
            Column::Timestamp => "datetime",
            Column::MsPlayed => "int64",
            Column::Shuffle | Column::Skipped => "bool",
            _ => "text",
        }
    }

    /// Text columns that may be filled with a sentinel.
    pub const fn is_categorical(self) -> bool {
        matches!(
            self,
            Column::TrackUri
                | Column::Platform
                | Column::TrackName
                | Column::ArtistName
                | Column::AlbumName
                | Column::ReasonStart
                | Column::ReasonEnd
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A CSV row before validation. Every cell is optional text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub spotify_track_uri: Option<String>,
    pub ts: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    pub ms_played: Option<String>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub reason_start: Option<String>,
    #[serde(default)]
    pub reason_end: Option<String>,
    pub shuffle: Option<String>,
    #[serde(default)]
    pub skipped: Option<String>,
}

/// Temporal fields derived from the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Temporal {
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl From<&NaiveDateTime> for Temporal {
    fn from(ts: &NaiveDateTime) -> Self {
        Self {
            hour: ts.hour(),
            day: ts.day(),
            month: ts.month(),
            year: ts.year(),
        }
    }
}

/// One streaming record with its derived temporal fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListeningEvent {
    pub track_uri: Option<String>,
    ts: NaiveDateTime,
    pub platform: Option<String>,
    pub ms_played: u64,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub reason_start: Option<String>,
    pub reason_end: Option<String>,
    pub shuffle: bool,
    pub skipped: Option<bool>,
    #[serde(flatten)]
    temporal: Temporal,
}

impl ListeningEvent {
    /// Minimal event; the remaining fields are set with the builder methods.
    pub fn new(ts: NaiveDateTime, artist: &str, ms_played: u64) -> Self {
        Self {
            track_uri: None,
            temporal: Temporal::from(&ts),
            ts,
            platform: None,
            ms_played,
            track_name: None,
            artist_name: Some(artist.to_string()),
            album_name: None,
            reason_start: None,
            reason_end: None,
            shuffle: false,
            skipped: Some(false),
        }
    }

    pub fn track(mut self, name: &str) -> Self {
        self.track_name = Some(name.to_string());
        self
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.platform = Some(platform.to_string());
        self
    }

    pub fn shuffled(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn skipped(mut self, skipped: Option<bool>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn reasons(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.reason_start = start.map(str::to_string);
        self.reason_end = end.map(str::to_string);
        self
    }

    /// Validate a raw CSV row. `row` is the 1-based data row, used in errors.
    pub fn from_raw(raw: RawEvent, row: usize) -> Result<Self> {
        let ts_text = raw
            .ts
            .as_deref()
            .ok_or_else(|| anyhow!("row {row}: missing timestamp"))?;
        let ts = parse_timestamp(ts_text).with_context(|| format!("row {row}: bad `ts` value"))?;

        let ms_played = raw
            .ms_played
            .as_deref()
            .ok_or_else(|| anyhow!("row {row}: missing ms_played"))?
            .trim()
            .parse::<u64>()
            .with_context(|| format!("row {row}: `ms_played` is not a non-negative integer"))?;

        let shuffle = raw
            .shuffle
            .as_deref()
            .ok_or_else(|| anyhow!("row {row}: missing shuffle flag"))
            .and_then(parse_flag)
            .with_context(|| format!("row {row}: bad `shuffle` value"))?;

        let skipped = raw
            .skipped
            .as_deref()
            .map(parse_flag)
            .transpose()
            .with_context(|| format!("row {row}: bad `skipped` value"))?;

        Ok(Self {
            track_uri: raw.spotify_track_uri,
            temporal: Temporal::from(&ts),
            ts,
            platform: raw.platform,
            ms_played,
            track_name: raw.track_name,
            artist_name: raw.artist_name,
            album_name: raw.album_name,
            reason_start: raw.reason_start,
            reason_end: raw.reason_end,
            shuffle,
            skipped,
        })
    }

    pub fn ts(&self) -> &NaiveDateTime {
        &self.ts
    }

    pub fn temporal(&self) -> Temporal {
        self.temporal
    }

    pub fn hour(&self) -> u32 {
        self.temporal.hour
    }

    pub fn day(&self) -> u32 {
        self.temporal.day
    }

    pub fn month(&self) -> u32 {
        self.temporal.month
    }

    pub fn year(&self) -> i32 {
        self.temporal.year
    }

    /// `None` when the column is not a text column.
    pub fn text(&self, column: Column) -> Option<Option<&str>> {
        let cell = match column {
            Column::TrackUri => &self.track_uri,
            Column::Platform => &self.platform,
            Column::TrackName => &self.track_name,
            Column::ArtistName => &self.artist_name,
            Column::AlbumName => &self.album_name,
            Column::ReasonStart => &self.reason_start,
            Column::ReasonEnd => &self.reason_end,
            _ => return None,
        };
        Some(cell.as_deref())
    }

    pub(crate) fn text_mut(&mut self, column: Column) -> Option<&mut Option<String>> {
        match column {
            Column::TrackUri => Some(&mut self.track_uri),
            Column::Platform => Some(&mut self.platform),
            Column::TrackName => Some(&mut self.track_name),
            Column::ArtistName => Some(&mut self.artist_name),
            Column::AlbumName => Some(&mut self.album_name),
            Column::ReasonStart => Some(&mut self.reason_start),
            Column::ReasonEnd => Some(&mut self.reason_end),
            _ => None,
        }
    }

    /// Whether the cell for `column` is empty.
    pub fn is_missing(&self, column: Column) -> bool {
        match column {
            Column::Skipped => self.skipped.is_none(),
            c if c.is_categorical() => matches!(self.text(c), Some(None)),
            _ => false,
        }
    }
}

/// Parse a boolean cell. Accepts true/false, 1/0 and yes/no in any case.
pub fn parse_flag(text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "f" | "n" => Ok(false),
        other => Err(anyhow!("expected a boolean flag, got `{other}`")),
    }
}

/// Parse a timestamp cell into naive UTC time.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.naive_utc());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("unrecognized timestamp `{text}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ts: &str) -> RawEvent {
        RawEvent {
            ts: Some(ts.to_string()),
            ms_played: Some("1234".to_string()),
            artist_name: Some("Artist".to_string()),
            shuffle: Some("False".to_string()),
            skipped: Some("True".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_fields_match_timestamp() {
        let event = ListeningEvent::from_raw(raw("2019-03-17 22:05:09"), 1).unwrap();
        assert_eq!(event.hour(), 22);
        assert_eq!(event.day(), 17);
        assert_eq!(event.month(), 3);
        assert_eq!(event.year(), 2019);
        assert_eq!(event.temporal(), Temporal::from(event.ts()));
    }

    #[test]
    fn test_rfc3339_is_converted_to_utc() {
        let event = ListeningEvent::from_raw(raw("2020-01-01T01:30:00+02:00"), 1).unwrap();
        assert_eq!(event.year(), 2019);
        assert_eq!(event.month(), 12);
        assert_eq!(event.day(), 31);
        assert_eq!(event.hour(), 23);
    }

    #[test]
    fn test_date_only_timestamp() {
        let ts = parse_timestamp("2021-07-04").unwrap();
        assert_eq!(Temporal::from(&ts).hour, 0);
    }

    #[test]
    fn test_flag_variants() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag(" 1 ").unwrap());
        assert!(!parse_flag("False").unwrap());
        assert!(!parse_flag("no").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let mut bad_ms = raw("2019-03-17 22:05:09");
        bad_ms.ms_played = Some("-5".to_string());
        assert!(ListeningEvent::from_raw(bad_ms, 3).is_err());

        let err = ListeningEvent::from_raw(raw("yesterday"), 7).unwrap_err();
        assert!(format!("{err:#}").contains("row 7"));

        let mut no_shuffle = raw("2019-03-17 22:05:09");
        no_shuffle.shuffle = None;
        assert!(ListeningEvent::from_raw(no_shuffle, 1).is_err());
    }

    #[test]
    fn test_missing_skipped_is_tracked() {
        let mut row = raw("2019-03-17 22:05:09");
        row.skipped = None;
        let event = ListeningEvent::from_raw(row, 1).unwrap();
        assert!(event.is_missing(Column::Skipped));
        assert!(event.is_missing(Column::ReasonStart));
        assert!(!event.is_missing(Column::ArtistName));
        assert!(!event.is_missing(Column::MsPlayed));
    }

    #[test]
    fn test_column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_name("nope"), None);
    }
}
