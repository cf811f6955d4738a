//! Temporal trends: month/year totals, hourly frequency and year-over-year change.

use super::{group_by, ms_to_minutes, period_over_period, GroupKey, GroupStats, GroupValue, Series};
use crate::event::ListeningEvent;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Serialize)]
pub struct ListeningPatterns {
    pub monthly_listening: Series,
    pub yearly_listening: Series,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyListening {
    pub hourly_listening_count: Series,
    pub hourly_listening_time: Series,
}

/// Aggregates for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearMetrics {
    pub year: i32,
    pub ms_played: u64,
    pub track_count: usize,
    pub unique_artists: usize,
    /// Percentage of known skipped flags that are set.
    pub skip_rate: f64,
    pub listening_time_minutes: f64,
}

/// Percent change of each [`YearMetrics`] field against the previous year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearChange {
    pub year: i32,
    pub ms_played_change_percent: Option<f64>,
    pub track_count_change_percent: Option<f64>,
    pub unique_artists_change_percent: Option<f64>,
    pub skip_rate_change_percent: Option<f64>,
    pub listening_time_minutes_change_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearOverYear {
    pub yearly_metrics: Vec<YearMetrics>,
    pub yearly_changes: Vec<YearChange>,
}

/// Minutes per calendar month (1-12, pooled across years) and per year.
pub fn listening_patterns(events: &[ListeningEvent]) -> ListeningPatterns {
    ListeningPatterns {
        monthly_listening: Series::from_groups(&group_by(events, GroupKey::Month), GroupStats::minutes),
        yearly_listening: Series::from_groups(&group_by(events, GroupKey::Year), GroupStats::minutes),
    }
}

/// Number of plays and minutes per hour of day.
pub fn hourly_listening(events: &[ListeningEvent]) -> HourlyListening {
    let groups = group_by(events, GroupKey::Hour);
    #[allow(clippy::cast_precision_loss)]
    let hourly_listening_count = Series::from_groups(&groups, |g| g.count as f64);
    HourlyListening {
        hourly_listening_count,
        hourly_listening_time: Series::from_groups(&groups, GroupStats::minutes),
    }
}

/// Per-year metrics and their change against the preceding year.
pub fn year_over_year(events: &[ListeningEvent]) -> YearOverYear {
    let mut artists: BTreeMap<i32, HashSet<&str>> = BTreeMap::new();
    for event in events {
        let seen = artists.entry(event.year()).or_default();
        if let Some(artist) = event.artist_name.as_deref() {
            seen.insert(artist);
        }
    }

    let yearly_metrics: Vec<YearMetrics> = group_by(events, GroupKey::Year)
        .iter()
        .map(|g| {
            let year = match g.key {
                GroupValue::Number(y) => i32::try_from(y).unwrap_or_default(),
                _ => 0,
            };
            YearMetrics {
                year,
                ms_played: g.ms_played,
                track_count: g.count,
                unique_artists: artists.get(&year).map_or(0, HashSet::len),
                skip_rate: g.skip_rate(),
                listening_time_minutes: ms_to_minutes(g.ms_played),
            }
        })
        .collect();

    let column = |pick: fn(&YearMetrics) -> f64| -> Vec<Option<f64>> {
        period_over_period(&yearly_metrics.iter().map(pick).collect::<Vec<_>>())
    };

    #[allow(clippy::cast_precision_loss)]
    let (ms, tracks, uniques, skips, minutes) = (
        column(|m| m.ms_played as f64),
        column(|m| m.track_count as f64),
        column(|m| m.unique_artists as f64),
        column(|m| m.skip_rate),
        column(|m| m.listening_time_minutes),
    );

    let yearly_changes = yearly_metrics
        .iter()
        .enumerate()
        .map(|(i, m)| YearChange {
            year: m.year,
            ms_played_change_percent: ms[i],
            track_count_change_percent: tracks[i],
            unique_artists_change_percent: uniques[i],
            skip_rate_change_percent: skips[i],
            listening_time_minutes_change_percent: minutes[i],
        })
        .collect();

    YearOverYear {
        yearly_metrics,
        yearly_changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::*;

    #[test]
    fn test_listening_patterns() {
        let patterns = listening_patterns(&history());
        assert_eq!(patterns.monthly_listening.labels(), vec!["1", "2", "6", "11"]);
        // 2019: 60000 + 30000 + 240000 ms
        assert!((patterns.yearly_listening.value_of("2019").unwrap() - 5.5).abs() < 1e-9);
        assert!((patterns.yearly_listening.value_of("2020").unwrap() - 5.25).abs() < 1e-9);
    }

    #[test]
    fn test_hourly_listening() {
        let hourly = hourly_listening(&history());
        assert_eq!(hourly.hourly_listening_count.values(), vec![3.0, 2.0, 1.0]);
        assert_eq!(hourly.hourly_listening_time.labels(), vec!["8", "21", "23"]);
        assert_eq!(hourly.hourly_listening_count.total(), 6.0);
    }

    #[test]
    fn test_year_over_year_fifty_percent() {
        let events = vec![
            play("2021-03-01 10:00:00", "A", 100 * 60_000, false),
            play("2022-03-01 10:00:00", "A", 150 * 60_000, false),
        ];
        let yoy = year_over_year(&events);

        assert_eq!(yoy.yearly_changes[0].listening_time_minutes_change_percent, None);
        let change = yoy.yearly_changes[1].listening_time_minutes_change_percent.unwrap();
        assert!((change - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_year_metrics() {
        let yoy = year_over_year(&history());
        assert_eq!(yoy.yearly_metrics.len(), 2);

        let y2019 = &yoy.yearly_metrics[0];
        assert_eq!(y2019.year, 2019);
        assert_eq!(y2019.track_count, 3);
        assert_eq!(y2019.unique_artists, 2);
        assert!((y2019.skip_rate - 100.0 / 3.0).abs() < 1e-9);

        let y2020 = &yoy.yearly_metrics[1];
        assert_eq!(y2020.unique_artists, 3);

        let change = &yoy.yearly_changes[1];
        assert_eq!(change.track_count_change_percent, Some(0.0));
        assert!((change.unique_artists_change_percent.unwrap() - 50.0).abs() < 1e-9);
        assert!(yoy.yearly_changes[0].ms_played_change_percent.is_none());
    }

    #[test]
    fn test_year_over_year_empty() {
        let yoy = year_over_year(&[]);
        assert!(yoy.yearly_metrics.is_empty());
        assert!(yoy.yearly_changes.is_empty());
    }
}
