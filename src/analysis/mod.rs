//! Aggregation engine shared by the analyzers.
//!
//! Every analysis is one pass over the event slice: [`group_by`] buckets rows
//! by a [`GroupKey`] and accumulates counts and sums, then the analyzers turn
//! the buckets into [`Series`] of `(label, value)` pairs.
//!
//! Conventions used by all analyzers:
//!
//! - millisecond sums become minutes via [`ms_to_minutes`]
//! - percentages are per-group count over the *total* row count, times 100
//! - top-N selections sort descending with a stable sort, then truncate
//! - rows whose grouping key is missing are left out of that grouping

pub mod interaction;
pub mod listening;
pub mod temporal;

use crate::event::ListeningEvent;
use log::trace;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: f64 = 60_000.0;

#[inline]
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_minutes(ms: u64) -> f64 {
    ms as f64 / MS_PER_MINUTE
}

/// Column an aggregation is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Artist,
    Track,
    Platform,
    Hour,
    Day,
    Month,
    Year,
    Shuffle,
    ReasonStart,
    ReasonEnd,
}

impl GroupKey {
    /// Key value for one event, `None` when the cell is missing.
    pub fn extract(self, event: &ListeningEvent) -> Option<GroupValue> {
        let text = |cell: &Option<String>| cell.as_ref().map(|s| GroupValue::Text(s.clone()));
        match self {
            GroupKey::Artist => text(&event.artist_name),
            GroupKey::Track => text(&event.track_name),
            GroupKey::Platform => text(&event.platform),
            GroupKey::ReasonStart => text(&event.reason_start),
            GroupKey::ReasonEnd => text(&event.reason_end),
            GroupKey::Hour => Some(GroupValue::Number(i64::from(event.hour()))),
            GroupKey::Day => Some(GroupValue::Number(i64::from(event.day()))),
            GroupKey::Month => Some(GroupValue::Number(i64::from(event.month()))),
            GroupKey::Year => Some(GroupValue::Number(i64::from(event.year()))),
            GroupKey::Shuffle => Some(GroupValue::Flag(event.shuffle)),
        }
    }
}

/// A grouping key value. Ordered so grouped output comes out sorted by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Flag(flag) => write!(f, "{}", if *flag { "True" } else { "False" }),
            GroupValue::Number(n) => write!(f, "{n}"),
            GroupValue::Text(s) => f.write_str(s),
        }
    }
}

/// Accumulated totals for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: GroupValue,
    pub count: usize,
    pub ms_played: u64,
    pub skipped: usize,
    /// Rows whose skipped flag is known; the denominator of the skip mean.
    pub skip_observed: usize,
}

impl GroupStats {
    fn new(key: GroupValue) -> Self {
        Self {
            key,
            count: 0,
            ms_played: 0,
            skipped: 0,
            skip_observed: 0,
        }
    }

    fn add(&mut self, event: &ListeningEvent) {
        self.count += 1;
        self.ms_played += event.ms_played;
        if let Some(skipped) = event.skipped {
            self.skip_observed += 1;
            if skipped {
                self.skipped += 1;
            }
        }
    }

    pub fn minutes(&self) -> f64 {
        ms_to_minutes(self.ms_played)
    }

    /// Mean minutes per play.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_minutes(&self) -> f64 {
        match self.count {
            0 => 0.0,
            n => self.minutes() / n as f64,
        }
    }

    /// Mean of the known skipped flags, as a percentage.
    #[allow(clippy::cast_precision_loss)]
    pub fn skip_rate(&self) -> f64 {
        match self.skip_observed {
            0 => 0.0,
            n => self.skipped as f64 / n as f64 * 100.0,
        }
    }
}

/// Bucket events by `key` in one pass. Output is sorted by key ascending.
pub fn group_by(events: &[ListeningEvent], key: GroupKey) -> Vec<GroupStats> {
    let mut groups: BTreeMap<GroupValue, GroupStats> = BTreeMap::new();

    for event in events {
        if let Some(value) = key.extract(event) {
            groups
                .entry(value.clone())
                .or_insert_with(|| GroupStats::new(value))
                .add(event);
        }
    }

    trace!("group_by {key:?}: {} groups from {} events", groups.len(), events.len());
    groups.into_values().collect()
}

/// Frequency of each key, highest first. Ties keep first-appearance order.
pub fn value_counts(events: &[ListeningEvent], key: GroupKey) -> Series {
    let mut order: Vec<GroupValue> = Vec::new();
    let mut counts: HashMap<GroupValue, usize> = HashMap::new();

    for value in events.iter().filter_map(|e| key.extract(e)) {
        let count = counts.entry(value.clone()).or_insert_with(|| {
            order.push(value);
            0
        });
        *count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let entries = order
        .into_iter()
        .map(|value| {
            let count = counts[&value];
            (value, count as f64)
        })
        .collect();

    Series::new(entries).sorted_desc()
}

/// Ordered `(label, value)` pairs, the result shape of every aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    entries: Vec<(GroupValue, f64)>,
}

impl Series {
    pub fn new(entries: Vec<(GroupValue, f64)>) -> Self {
        Self { entries }
    }

    /// Build from grouped stats with a metric picked per group.
    pub fn from_groups(groups: &[GroupStats], metric: impl Fn(&GroupStats) -> f64) -> Self {
        Self::new(groups.iter().map(|g| (g.key.clone(), metric(g))).collect())
    }

    /// Stable sort by value, highest first.
    #[must_use]
    pub fn sorted_desc(mut self) -> Self {
        self.entries
            .sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        self
    }

    /// First `n` entries.
    #[must_use]
    pub fn head(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    /// Sorted descending, then truncated.
    #[must_use]
    pub fn top(self, n: usize) -> Self {
        self.sorted_desc().head(n)
    }

    /// Each value divided by `total` and scaled to a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_of(&self, total: usize) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| {
                let pct = if total == 0 { 0.0 } else { v / total as f64 * 100.0 };
                (k.clone(), pct)
            })
            .collect();
        Self::new(entries)
    }

    pub fn get(&self, key: &GroupValue) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Lookup by display label, handy for text keys.
    pub fn value_of(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k.to_string() == label)
            .map(|(_, v)| *v)
    }

    pub fn entries(&self) -> &[(GroupValue, f64)] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Percent change from `previous` to `current`. `None` when `previous` is zero.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Change of each value against the one before it; the first is always `None`.
pub fn period_over_period(values: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(values.windows(2).map(|w| percent_change(w[0], w[1])))
        .take(values.len())
        .collect()
}
