//! Interaction patterns: shuffle usage and why tracks start or stop.

use super::{group_by, value_counts, GroupKey, GroupValue, Series};
use crate::event::ListeningEvent;
use serde::Serialize;

/// Totals for shuffle or non-shuffle playback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShuffleMetrics {
    pub shuffle: bool,
    pub play_count: usize,
    pub total_listening_minutes: f64,
    pub avg_listening_minutes: f64,
    /// Percentage of known skipped flags that are set.
    pub skip_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasonBreakdown {
    pub start_reasons_count: Series,
    pub start_reasons_percent: Series,
    pub end_reasons_count: Series,
    pub end_reasons_percent: Series,
}

/// One entry per shuffle flag present, `false` first.
pub fn shuffle_listening(events: &[ListeningEvent]) -> Vec<ShuffleMetrics> {
    group_by(events, GroupKey::Shuffle)
        .iter()
        .map(|g| ShuffleMetrics {
            shuffle: g.key == GroupValue::Flag(true),
            play_count: g.count,
            total_listening_minutes: g.minutes(),
            avg_listening_minutes: g.mean_minutes(),
            skip_rate: g.skip_rate(),
        })
        .collect()
}

/// Frequency of each start and end reason, also as a share of all rows.
pub fn track_start_end_reasons(events: &[ListeningEvent]) -> ReasonBreakdown {
    let start_reasons_count = value_counts(events, GroupKey::ReasonStart);
    let end_reasons_count = value_counts(events, GroupKey::ReasonEnd);

    ReasonBreakdown {
        start_reasons_percent: start_reasons_count.percent_of(events.len()),
        end_reasons_percent: end_reasons_count.percent_of(events.len()),
        start_reasons_count,
        end_reasons_count,
    }
}
