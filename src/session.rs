//! # Session Module
//!
//! The session owns the loaded [`Dataset`] and the resolved configuration.
//! Both front ends (one-shot CLI commands and the interactive menu) go
//! through [`Session::perform`], which runs one [`Analysis`] against the
//! table and prints its report.

use crate::analysis::{interaction, listening, temporal};
use crate::config::RuntimeConfig;
use crate::dataset::Dataset;
use crate::event::Column;
use crate::render::{emit, ChartStyle, MissingValues, SampleRows, TopArtistTime};
use anyhow::Result;
use log::{debug, info, warn};
use std::io::Write;

/// Every report the tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    DatasetInfo,
    MissingValues,
    ArtistListeningTime,
    PeakListeningTimes,
    MostPlayedArtists,
    SkipRates,
    PlatformUsage,
    ListeningPatterns,
    HourlyListening,
    YearOverYear,
    ShuffleListening,
    TrackStartEndReasons,
}

impl Analysis {
    /// The analyses run by `report`, in menu order.
    pub const REPORT: [Analysis; 10] = [
        Analysis::ArtistListeningTime,
        Analysis::PeakListeningTimes,
        Analysis::MostPlayedArtists,
        Analysis::SkipRates,
        Analysis::PlatformUsage,
        Analysis::ListeningPatterns,
        Analysis::HourlyListening,
        Analysis::YearOverYear,
        Analysis::ShuffleListening,
        Analysis::TrackStartEndReasons,
    ];

    /// Whether this analysis reads the table rather than inspecting it.
    pub const fn needs_clean_data(self) -> bool {
        !matches!(self, Analysis::DatasetInfo | Analysis::MissingValues)
    }
}

/// A loaded table plus how to analyse and print it.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    config: RuntimeConfig,
    json: bool,
}

impl Session {
    pub fn new(dataset: Dataset, config: RuntimeConfig) -> Self {
        Self {
            dataset,
            config,
            json: false,
        }
    }

    /// Emit JSON instead of text reports.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn style(&self) -> ChartStyle {
        ChartStyle {
            width: self.config.chart_width.max(1),
        }
    }

    /// The configured fill columns, resolved.
    pub fn fill_columns(&self) -> Result<Vec<Column>> {
        Ok(Dataset::parse_columns(&self.config.fill_columns)?)
    }

    /// Whether any configured fill column still has gaps.
    pub fn needs_fill(&self) -> Result<bool> {
        Ok(self.dataset.has_missing_in(&self.fill_columns()?))
    }

    /// Fill `columns` (or the configured ones when empty) with the sentinel.
    pub fn fill_missing(&mut self, columns: &[String]) -> Result<usize> {
        let columns = if columns.is_empty() {
            self.fill_columns()?
        } else {
            Dataset::parse_columns(columns)?
        };
        Ok(self
            .dataset
            .fill_missing(&columns, &self.config.missing_sentinel)?)
    }

    /// Fill gaps without asking; used by one-shot commands.
    pub fn auto_fill(&mut self) -> Result<()> {
        if self.needs_fill()? {
            let filled = self.fill_missing(&[])?;
            warn!(
                "Filled {filled} missing values in {:?} with `{}` before analysis",
                self.config.fill_columns, self.config.missing_sentinel
            );
        }
        Ok(())
    }

    /// Print `n` random rows.
    pub fn show_sample(&self, n: usize, out: &mut dyn Write) -> Result<()> {
        let rows = self.dataset.sample(n, &mut rand::thread_rng());
        emit(&SampleRows { rows }, self.json, out, &self.style())
    }

    /// Run one analysis and print its report.
    pub fn perform(&self, analysis: Analysis, out: &mut dyn Write) -> Result<()> {
        debug!("Running {analysis:?} over {} events", self.dataset.len());
        let events = self.dataset.events();
        let style = self.style();
        let json = self.json;
        let top_n = self.config.top_n;

        match analysis {
            Analysis::DatasetInfo => emit(&self.dataset.info(), json, out, &style),
            Analysis::MissingValues => {
                if !json && !self.dataset.has_missing() {
                    writeln!(out, "No missing values found.")?;
                    return Ok(());
                }
                emit(&MissingValues::from(&self.dataset), json, out, &style)
            }
            Analysis::ArtistListeningTime => {
                let report = TopArtistTime {
                    top_n,
                    listening_time_per_artist: listening::artist_listening_time(events).head(top_n),
                };
                emit(&report, json, out, &style)
            }
            Analysis::PeakListeningTimes => emit(
                &listening::peak_listening_times(events, self.config.peak_n),
                json,
                out,
                &style,
            ),
            Analysis::MostPlayedArtists => {
                emit(&listening::most_played_artists(events, top_n), json, out, &style)
            }
            Analysis::SkipRates => emit(&listening::skip_rates(events, top_n), json, out, &style),
            Analysis::PlatformUsage => emit(&listening::platform_usage(events), json, out, &style),
            Analysis::ListeningPatterns => emit(&temporal::listening_patterns(events), json, out, &style),
            Analysis::HourlyListening => emit(&temporal::hourly_listening(events), json, out, &style),
            Analysis::YearOverYear => emit(&temporal::year_over_year(events), json, out, &style),
            Analysis::ShuffleListening => {
                emit(&interaction::shuffle_listening(events), json, out, &style)
            }
            Analysis::TrackStartEndReasons => {
                emit(&interaction::track_start_end_reasons(events), json, out, &style)
            }
        }
    }

    /// Every analysis in sequence.
    pub fn report(&self, out: &mut dyn Write) -> Result<()> {
        info!("Running full report over {} events", self.dataset.len());
        for analysis in Analysis::REPORT {
            self.perform(analysis, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::history;

    fn session() -> Session {
        Session::new(Dataset::with_all_columns(history()), RuntimeConfig::default())
    }

    fn output(session: &Session, analysis: Analysis) -> String {
        let mut buf = Vec::new();
        session.perform(analysis, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_every_analysis_renders() {
        let session = session();
        for analysis in Analysis::REPORT {
            assert!(!output(&session, analysis).is_empty(), "{analysis:?} printed nothing");
        }
    }

    #[test]
    fn test_fill_then_clean() {
        let mut session = session();
        assert!(session.needs_fill().unwrap());

        let filled = session.fill_missing(&[]).unwrap();
        assert_eq!(filled, 12);
        assert!(!session.needs_fill().unwrap());
        assert_eq!(session.dataset().len(), 6);
    }

    #[test]
    fn test_fill_explicit_columns() {
        let mut session = session();
        let filled = session.fill_missing(&["platform".to_string()]).unwrap();
        assert_eq!(filled, 0);
        assert!(session.fill_missing(&["ms_played".to_string()]).is_err());
    }

    #[test]
    fn test_no_missing_message() {
        let mut session = session();
        for column in Column::ALL.into_iter().filter(|c| c.is_categorical()) {
            session.fill_missing(&[column.name().to_string()]).unwrap();
        }
        assert!(output(&session, Analysis::MissingValues).contains("No missing values found."));
    }

    #[test]
    fn test_json_output_parses() {
        let session = session().with_json(true);
        let text = output(&session, Analysis::YearOverYear);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["yearly_metrics"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_sample() {
        let session = session();
        let mut buf = Vec::new();
        session.show_sample(2, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().filter(|l| l.contains(" ms ")).count(), 2);
    }
}
