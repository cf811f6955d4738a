//! Listening behavior: where the time goes, when, and what gets skipped.

use super::{group_by, ms_to_minutes, value_counts, GroupKey, GroupStats, GroupValue, Series};
use crate::event::ListeningEvent;
use log::debug;
use serde::Serialize;

/// Minutes per hour of day and per day of month.
#[derive(Debug, Clone, Serialize)]
pub struct PeakTimes {
    pub hourly_listening: Series,
    pub daily_listening: Series,
    pub peak_hours: Series,
    pub peak_days: Series,
}

#[derive(Debug, Clone, Serialize)]
pub struct MostPlayed {
    pub top_n: usize,
    pub plays_per_artist: Series,
    pub listening_time_per_artist: Series,
}

/// Skip rate and play count for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipRate {
    pub key: GroupValue,
    pub skip_rate: f64,
    pub total_plays: usize,
}

impl From<&GroupStats> for SkipRate {
    fn from(stats: &GroupStats) -> Self {
        Self {
            key: stats.key.clone(),
            skip_rate: stats.skip_rate(),
            total_plays: stats.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkipInsights {
    /// Skipped rows over all rows, as a percentage.
    pub overall_skip_rate: f64,
    pub top_skipped_artists: Vec<SkipRate>,
    pub hourly_skip_rates: Vec<SkipRate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformUsage {
    pub platform_counts: Series,
    pub platform_listening_time: Series,
}

/// Total minutes per artist, highest first.
pub fn artist_listening_time(events: &[ListeningEvent]) -> Series {
    Series::from_groups(&group_by(events, GroupKey::Artist), GroupStats::minutes).sorted_desc()
}

/// Minutes by hour and by day of month, with the `top` busiest of each.
pub fn peak_listening_times(events: &[ListeningEvent], top: usize) -> PeakTimes {
    let hourly_listening = Series::from_groups(&group_by(events, GroupKey::Hour), GroupStats::minutes);
    let daily_listening = Series::from_groups(&group_by(events, GroupKey::Day), GroupStats::minutes);

    PeakTimes {
        peak_hours: hourly_listening.clone().top(top),
        peak_days: daily_listening.clone().top(top),
        hourly_listening,
        daily_listening,
    }
}

/// Top artists by play count and by minutes.
pub fn most_played_artists(events: &[ListeningEvent], top_n: usize) -> MostPlayed {
    MostPlayed {
        top_n,
        plays_per_artist: value_counts(events, GroupKey::Artist).head(top_n),
        listening_time_per_artist: artist_listening_time(events).head(top_n),
    }
}

/// Overall skip rate, the `top_n` most-skipped artists and the rate per hour.
pub fn skip_rates(events: &[ListeningEvent], top_n: usize) -> SkipInsights {
    let total_skips = events.iter().filter(|e| e.skipped == Some(true)).count();
    #[allow(clippy::cast_precision_loss)]
    let overall_skip_rate = match events.len() {
        0 => 0.0,
        total => total_skips as f64 / total as f64 * 100.0,
    };
    debug!("{total_skips} skips over {} plays", events.len());

    let mut top_skipped_artists: Vec<SkipRate> =
        group_by(events, GroupKey::Artist).iter().map(SkipRate::from).collect();
    top_skipped_artists.sort_by(|a, b| {
        b.skip_rate
            .partial_cmp(&a.skip_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top_skipped_artists.truncate(top_n);

    let hourly_skip_rates = group_by(events, GroupKey::Hour).iter().map(SkipRate::from).collect();

    SkipInsights {
        overall_skip_rate,
        top_skipped_artists,
        hourly_skip_rates,
    }
}

/// Plays and minutes per platform.
pub fn platform_usage(events: &[ListeningEvent]) -> PlatformUsage {
    let groups = group_by(events, GroupKey::Platform);
    PlatformUsage {
        platform_counts: value_counts(events, GroupKey::Platform),
        platform_listening_time: Series::from_groups(&groups, |g| ms_to_minutes(g.ms_played)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::*;

    #[test]
    fn test_two_plays_of_one_artist() {
        let events = vec![
            play("2020-01-01 10:00:00", "A", 60_000, false),
            play("2020-01-01 10:05:00", "A", 30_000, true),
        ];

        let time = artist_listening_time(&events);
        assert!((time.value_of("A").unwrap() - 1.5).abs() < 1e-9);

        let skips = skip_rates(&events, 10);
        assert!((skips.top_skipped_artists[0].skip_rate - 50.0).abs() < 1e-9);
        assert_eq!(skips.top_skipped_artists[0].total_plays, 2);
        assert!((skips.overall_skip_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_artist_time_sorted_descending() {
        let time = artist_listening_time(&history());
        assert_eq!(time.labels(), vec!["A", "B", "C"]);
        assert!((time.value_of("A").unwrap() - 4.5).abs() < 1e-9);
        assert!((time.value_of("B").unwrap() - 4.25).abs() < 1e-9);
        let values = time.values();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_peak_times() {
        let peaks = peak_listening_times(&history(), 2);
        // hour 21: 240000 + 180000 ms = 7 minutes
        assert_eq!(peaks.peak_hours.labels(), vec!["21", "8"]);
        assert!((peaks.peak_hours.values()[0] - 7.0).abs() < 1e-9);
        assert_eq!(peaks.hourly_listening.len(), 3);
        assert!(peaks.peak_days.len() <= 2);
        assert_eq!(peaks.daily_listening.labels(), vec!["1", "3", "5", "12", "30"]);
    }

    #[test]
    fn test_most_played_truncates() {
        let most = most_played_artists(&history(), 2);
        assert_eq!(most.plays_per_artist.labels(), vec!["A", "B"]);
        assert_eq!(most.listening_time_per_artist.len(), 2);
    }

    #[test]
    fn test_skip_rates_by_hour() {
        let skips = skip_rates(&history(), 10);
        assert!((skips.overall_skip_rate - 2.0 / 6.0 * 100.0).abs() < 1e-9);

        let eight = skips
            .hourly_skip_rates
            .iter()
            .find(|r| r.key == GroupValue::Number(8))
            .unwrap();
        assert_eq!(eight.total_plays, 3);
        assert!((eight.skip_rate - 100.0 / 3.0).abs() < 1e-9);

        // B: 1 of 2 skipped, A: 1 of 3, C: none
        let order: Vec<String> = skips.top_skipped_artists.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_platform_usage() {
        let usage = platform_usage(&history());
        assert_eq!(usage.platform_counts.labels(), vec!["android", "ios"]);
        assert_eq!(usage.platform_counts.values(), vec![3.0, 3.0]);
        let total: f64 = usage.platform_listening_time.total();
        assert!((total - 645_000.0 / 60_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let skips = skip_rates(&[], 10);
        assert_eq!(skips.overall_skip_rate, 0.0);
        assert!(skips.top_skipped_artists.is_empty());
        assert!(artist_listening_time(&[]).is_empty());
    }
}
