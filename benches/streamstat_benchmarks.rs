//! # Streamstat Performance Benchmarks
//!
//! Benchmarks for the hot paths: CSV loading, the group-by engine and each
//! analyzer over a synthetic listening history.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench group_by
//! cargo bench analyzers
//! ```

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::fmt::Write as _;
use std::hint::black_box;
use streamstat::analysis::{self, interaction, listening, temporal, GroupKey};
use streamstat::dataset::Dataset;
use streamstat::event::{Column, ListeningEvent};

const PLATFORMS: [&str; 4] = ["android", "iOS", "windows", "web player"];
const END_REASONS: [&str; 5] = ["trackdone", "fwdbtn", "endplay", "clickrow", "logout"];

/// Helper function to create a deterministic history of `count` events
fn create_test_events(count: usize) -> Vec<ListeningEvent> {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");

    (0..count)
        .map(|i| {
            // roughly one play every 97 minutes, spanning several years at 50k events
            let ts = start + Duration::minutes(i as i64 * 97);
            let end = END_REASONS[i % END_REASONS.len()];
            ListeningEvent::new(ts, &format!("Artist {}", i % 250), (i as u64 * 7_919) % 300_000)
                .track(&format!("Track {}", i % 2_000))
                .platform(PLATFORMS[i % PLATFORMS.len()])
                .shuffled(i % 3 == 0)
                .skipped(Some(end == "fwdbtn"))
                .reasons(Some("trackdone"), if i % 40 == 0 { None } else { Some(end) })
        })
        .collect()
}

/// Same history rendered as CSV text
fn create_test_csv(count: usize) -> String {
    let mut csv = String::from("ts,platform,ms_played,track_name,artist_name,reason_start,reason_end,shuffle,skipped\n");
    for event in create_test_events(count) {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{},{},{}",
            event.ts().format("%Y-%m-%d %H:%M:%S"),
            event.platform.as_deref().unwrap_or_default(),
            event.ms_played,
            event.track_name.as_deref().unwrap_or_default(),
            event.artist_name.as_deref().unwrap_or_default(),
            event.reason_start.as_deref().unwrap_or_default(),
            event.reason_end.as_deref().unwrap_or_default(),
            if event.shuffle { "True" } else { "False" },
            if event.skipped == Some(true) { "True" } else { "False" },
        );
    }
    csv
}

/// Benchmark CSV parsing and cleaning
fn benchmark_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading");

    for size in [1_000, 10_000, 50_000] {
        let csv = create_test_csv(size);
        group.bench_with_input(BenchmarkId::new("from_reader", size), &csv, |b, csv| {
            b.iter(|| Dataset::from_reader(black_box(csv.as_bytes())).expect("valid csv"))
        });
    }

    let events = create_test_events(50_000);
    group.bench_function("fill_missing_50k", |b| {
        b.iter_batched(
            || Dataset::with_all_columns(events.clone()),
            |mut dataset| {
                dataset
                    .fill_missing(&[Column::ReasonStart, Column::ReasonEnd], "unknown")
                    .expect("text columns")
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

/// Benchmark the group-by engine per key type
fn benchmark_group_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by");
    let events = create_test_events(50_000);

    for (name, key) in [
        ("artist", GroupKey::Artist),
        ("track", GroupKey::Track),
        ("hour", GroupKey::Hour),
        ("shuffle", GroupKey::Shuffle),
    ] {
        group.bench_with_input(BenchmarkId::new("group_by", name), &key, |b, &key| {
            b.iter(|| analysis::group_by(black_box(&events), key))
        });
    }

    group.bench_function("value_counts_artist", |b| {
        b.iter(|| analysis::value_counts(black_box(&events), GroupKey::Artist))
    });

    group.finish();
}

/// Benchmark every analyzer over the same table
fn benchmark_analyzers(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzers");
    let events = create_test_events(50_000);

    group.bench_function("artist_listening_time", |b| {
        b.iter(|| listening::artist_listening_time(black_box(&events)))
    });
    group.bench_function("peak_listening_times", |b| {
        b.iter(|| listening::peak_listening_times(black_box(&events), 5))
    });
    group.bench_function("skip_rates", |b| {
        b.iter(|| listening::skip_rates(black_box(&events), 10))
    });
    group.bench_function("platform_usage", |b| {
        b.iter(|| listening::platform_usage(black_box(&events)))
    });
    group.bench_function("year_over_year", |b| {
        b.iter(|| temporal::year_over_year(black_box(&events)))
    });
    group.bench_function("shuffle_listening", |b| {
        b.iter(|| interaction::shuffle_listening(black_box(&events)))
    });
    group.bench_function("track_start_end_reasons", |b| {
        b.iter(|| interaction::track_start_end_reasons(black_box(&events)))
    });

    group.finish();
}

// Group all benchmarks
criterion_group!(benches, benchmark_loading, benchmark_group_by, benchmark_analyzers);

criterion_main!(benches);
