//! # Console Rendering Module
//!
//! Turns analysis results into terminal output: headed summaries plus
//! horizontal bar charts drawn with block characters. Every result type also
//! derives `Serialize`, so [`emit`] can print pretty JSON instead when the
//! user asks for machine-readable output.

use crate::analysis::interaction::{ReasonBreakdown, ShuffleMetrics};
use crate::analysis::listening::{MostPlayed, PeakTimes, PlatformUsage, SkipInsights, SkipRate};
use crate::analysis::temporal::{HourlyListening, ListeningPatterns, YearOverYear};
use crate::analysis::Series;
use crate::dataset::{Dataset, DatasetInfo};
use crate::event::ListeningEvent;
use serde::Serialize;
use std::io::{self, Write};

const BAR: char = '█';

/// How charts are drawn.
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    /// Width in characters of the longest bar.
    pub width: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self { width: 50 }
    }
}

/// A result that can be printed for humans.
pub trait Report: Serialize {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()>;
}

/// Print `report` as text, or as pretty JSON when `json` is set.
pub fn emit<R: Report + ?Sized>(report: &R, json: bool, out: &mut dyn Write, style: &ChartStyle) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
    } else {
        report.render(out, style)?;
    }
    Ok(())
}

/// Horizontal bar chart, one line per label, scaled to the largest value.
pub fn bar_chart(
    out: &mut dyn Write,
    style: &ChartStyle,
    title: &str,
    x_label: &str,
    y_label: &str,
    labels: &[String],
    values: &[f64],
) -> io::Result<()> {
    writeln!(out, "\n{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))?;

    if labels.is_empty() {
        return writeln!(out, "(no data)");
    }

    let label_width = labels
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(x_label.chars().count()))
        .max()
        .unwrap_or(0);
    let max = values.iter().copied().filter(|v| v.is_finite()).fold(0.0_f64, f64::max);

    writeln!(out, "{x_label:<label_width$} | {y_label}")?;
    for (label, &value) in labels.iter().zip(values) {
        writeln!(
            out,
            "{label:<label_width$} | {} {}",
            bar(value, max, style.width),
            format_value(value)
        )?;
    }
    Ok(())
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if !value.is_finite() || value <= 0.0 || max <= 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let len = ((value / max) * width as f64).round().max(1.0) as usize;
    BAR.to_string().repeat(len)
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_change(change: Option<f64>) -> String {
    change.map_or_else(|| "n/a".to_string(), |c| format!("{c:+.2}%"))
}

fn series_chart(
    out: &mut dyn Write,
    style: &ChartStyle,
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &Series,
) -> io::Result<()> {
    bar_chart(out, style, title, x_label, y_label, &series.labels(), &series.values())
}

fn skip_chart(out: &mut dyn Write, style: &ChartStyle, title: &str, x_label: &str, rates: &[SkipRate]) -> io::Result<()> {
    let labels: Vec<String> = rates.iter().map(|r| r.key.to_string()).collect();
    let values: Vec<f64> = rates.iter().map(|r| r.skip_rate).collect();
    bar_chart(out, style, title, x_label, "Skip Rate (%)", &labels, &values)
}

/// Minutes for the top artists.
#[derive(Debug, Clone, Serialize)]
pub struct TopArtistTime {
    pub top_n: usize,
    pub listening_time_per_artist: Series,
}

impl Report for TopArtistTime {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        series_chart(
            out,
            style,
            &format!("Top {} Artists by Total Listening Time", self.top_n),
            "Artist",
            "Listening Time (Minutes)",
            &self.listening_time_per_artist,
        )
    }
}

impl Report for PeakTimes {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        series_chart(out, style, "Listening Time by Hour", "Hour of Day", "Total Listening Time (Minutes)", &self.hourly_listening)?;
        series_chart(out, style, "Listening Time by Day", "Day of Month", "Total Listening Time (Minutes)", &self.daily_listening)?;

        writeln!(out, "\nPeak hours: {}", self.peak_hours.labels().join(", "))?;
        writeln!(out, "Peak days: {}", self.peak_days.labels().join(", "))
    }
}

impl Report for MostPlayed {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        series_chart(
            out,
            style,
            &format!("Top {} Artists by Number of Plays", self.top_n),
            "Artist",
            "Number of Plays",
            &self.plays_per_artist,
        )?;
        series_chart(
            out,
            style,
            &format!("Top {} Artists by Listening Time", self.top_n),
            "Artist",
            "Listening Time (Minutes)",
            &self.listening_time_per_artist,
        )
    }
}

impl Report for SkipInsights {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        writeln!(out, "\nOverall skip rate: {:.2}%", self.overall_skip_rate)?;
        skip_chart(out, style, "Skip Rates by Hour", "Hour of Day", &self.hourly_skip_rates)?;
        skip_chart(
            out,
            style,
            &format!("Top {} Artists by Skip Rate", self.top_skipped_artists.len()),
            "Artist",
            &self.top_skipped_artists,
        )
    }
}

impl Report for PlatformUsage {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        series_chart(out, style, "Platform Usage Count", "Platform", "Count Number", &self.platform_counts)?;
        series_chart(
            out,
            style,
            "Platform Listening Time (Minutes)",
            "Platform",
            "Total Listening Time",
            &self.platform_listening_time,
        )
    }
}

impl Report for ListeningPatterns {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        series_chart(out, style, "Listening Time by Month", "Month", "Total Listening Time (Minutes)", &self.monthly_listening)?;
        series_chart(out, style, "Listening Time by Year", "Year", "Total Listening Time (Minutes)", &self.yearly_listening)
    }
}

impl Report for HourlyListening {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        series_chart(
            out,
            style,
            "Listening Frequency by Hour",
            "Hour of Day",
            "Number of Listening Sessions",
            &self.hourly_listening_count,
        )?;
        series_chart(out, style, "Listening Time by Hour", "Hour of Day", "Total Listening Time (Minutes)", &self.hourly_listening_time)
    }
}

impl Report for YearOverYear {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        let years: Vec<String> = self.yearly_metrics.iter().map(|m| m.year.to_string()).collect();
        #[allow(clippy::cast_precision_loss)]
        let artists: Vec<f64> = self.yearly_metrics.iter().map(|m| m.unique_artists as f64).collect();
        let minutes: Vec<f64> = self.yearly_metrics.iter().map(|m| m.listening_time_minutes).collect();

        bar_chart(out, style, "Yearly Listening Time", "Year", "Total Listening Time (Minutes)", &years, &minutes)?;
        bar_chart(out, style, "Unique Artists per Year", "Year", "Number of Unique Artists", &years, &artists)?;

        writeln!(out, "\nYear-over-year change")?;
        writeln!(out, "{:<6} {:>12} {:>12} {:>12} {:>12}", "Year", "Minutes", "Tracks", "Artists", "Skip rate")?;
        for change in &self.yearly_changes {
            writeln!(
                out,
                "{:<6} {:>12} {:>12} {:>12} {:>12}",
                change.year,
                format_change(change.listening_time_minutes_change_percent),
                format_change(change.track_count_change_percent),
                format_change(change.unique_artists_change_percent),
                format_change(change.skip_rate_change_percent),
            )?;
        }
        Ok(())
    }
}

impl Report for Vec<ShuffleMetrics> {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        let labels: Vec<String> = self
            .iter()
            .map(|m| if m.shuffle { "True" } else { "False" }.to_string())
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let counts: Vec<f64> = self.iter().map(|m| m.play_count as f64).collect();
        let minutes: Vec<f64> = self.iter().map(|m| m.total_listening_minutes).collect();

        bar_chart(out, style, "Listening Sessions: Shuffle vs Non-Shuffle", "Shuffle", "Number of Sessions", &labels, &counts)?;
        bar_chart(out, style, "Total Listening Time: Shuffle vs Non-Shuffle", "Shuffle", "Listening Time (Minutes)", &labels, &minutes)?;

        writeln!(out)?;
        for m in self {
            writeln!(
                out,
                "shuffle={:<5} plays={} avg={:.2} min skip rate={:.2}%",
                m.shuffle, m.play_count, m.avg_listening_minutes, m.skip_rate
            )?;
        }
        Ok(())
    }
}

impl Report for ReasonBreakdown {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        series_chart(out, style, "Reasons for Track Start", "Start Reason", "Start Reason Percentage", &self.start_reasons_percent)?;
        series_chart(out, style, "Reasons for Track End", "End Reason", "End Reason Percentage", &self.end_reasons_percent)
    }
}

impl Report for DatasetInfo {
    fn render(&self, out: &mut dyn Write, _style: &ChartStyle) -> io::Result<()> {
        writeln!(out, "\nInformation about the dataset:\n")?;
        writeln!(out, "The dataset is about the streaming history of Spotify.")?;
        writeln!(out, "It contains {} rows and {} columns.", self.length, self.columns.len())?;
        writeln!(out, "The columns are: {}", self.columns.join(", "))?;
        writeln!(out, "Number of missing values: {}", self.total_missing_values)?;
        writeln!(out, "Data types of columns:")?;
        for (name, dtype) in &self.data_types {
            writeln!(out, "  {name:<20} {dtype}")?;
        }
        Ok(())
    }
}

/// Missing cells per column.
#[derive(Debug, Clone, Serialize)]
pub struct MissingValues {
    pub columns: Vec<(String, usize)>,
}

impl From<&Dataset> for MissingValues {
    fn from(dataset: &Dataset) -> Self {
        Self {
            columns: dataset
                .missing_counts()
                .into_iter()
                .map(|(c, n)| (c.name().to_string(), n))
                .collect(),
        }
    }
}

impl Report for MissingValues {
    fn render(&self, out: &mut dyn Write, style: &ChartStyle) -> io::Result<()> {
        let labels: Vec<String> = self.columns.iter().map(|(c, _)| c.clone()).collect();
        #[allow(clippy::cast_precision_loss)]
        let values: Vec<f64> = self.columns.iter().map(|(_, n)| *n as f64).collect();
        bar_chart(out, style, "Missing Values per Column", "Columns", "Number of Missing Values", &labels, &values)
    }
}

/// Randomly drawn rows.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRows<'a> {
    pub rows: Vec<&'a ListeningEvent>,
}

impl Report for SampleRows<'_> {
    fn render(&self, out: &mut dyn Write, _style: &ChartStyle) -> io::Result<()> {
        let text = |cell: &Option<String>| cell.clone().unwrap_or_else(|| "NaN".to_string());
        writeln!(out)?;
        for event in &self.rows {
            writeln!(
                out,
                "{} | {} | {} - {} | {} ms | shuffle={} skipped={} | {} -> {}",
                event.ts(),
                text(&event.platform),
                text(&event.artist_name),
                text(&event.track_name),
                event.ms_played,
                event.shuffle,
                event.skipped.map_or_else(|| "NaN".to_string(), |s| s.to_string()),
                text(&event.reason_start),
                text(&event.reason_end),
            )?;
        }
        Ok(())
    }
}
