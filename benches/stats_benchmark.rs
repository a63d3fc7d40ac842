use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use run_tracker::locale::Locale;
use run_tracker::models::{Run, RunStats, RunStatsRow, RunType};
use run_tracker::services::run_list::format_runs;
use std::hint::black_box;

const RUN_TYPES: [&str; 6] = ["easy", "tempo", "interval", "long", "recovery", "fartlek"];

/// A few years of daily runs, oldest first.
fn history(count: usize) -> Vec<Run> {
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 7, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let distance = 3.0 + (i % 18) as f64;
            let duration = (distance * 330.0) as u64;
            Run {
                id: format!("run-{i}"),
                user_id: "bench-user".to_string(),
                distance,
                duration,
                // Every tenth row predates pace being stored.
                pace: (i % 10 != 0).then(|| duration as f64 / 60.0 / distance),
                run_type: RUN_TYPES[i % RUN_TYPES.len()].to_string(),
                notes: (i % 3 == 0).then(|| "Felt good".to_string()),
                date: start + Duration::days(i as i64),
            }
        })
        .collect()
}

fn benchmark_dashboard_data(c: &mut Criterion) {
    let runs = history(1500);
    let rows: Vec<RunStatsRow> = runs.iter().map(RunStatsRow::from).collect();
    assert!(RunType::from_db(&runs[5].run_type).is_none());

    let mut group = c.benchmark_group("dashboard_data");

    group.bench_function("aggregate_stats", |b| {
        b.iter(|| RunStats::from_rows(black_box(&rows)))
    });

    group.bench_function("format_run_list_ru", |b| {
        b.iter(|| format_runs(black_box(&runs), Locale::Ru))
    });

    group.bench_function("format_run_list_en", |b| {
        b.iter(|| format_runs(black_box(&runs), Locale::En))
    });

    group.finish();
}

criterion_group!(benches, benchmark_dashboard_data);
criterion_main!(benches);
