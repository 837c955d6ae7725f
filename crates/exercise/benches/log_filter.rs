use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use fittrack_core::UserId;
use fittrack_exercise::{
    filter_log, Description, ExerciseDate, ExerciseEntry, LogFilter, Minutes, NewExercise,
};

fn build_log(len: usize) -> Vec<ExerciseEntry> {
    let owner = UserId::new();
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    (0..len)
        .map(|i| {
            ExerciseEntry::new(
                owner,
                NewExercise {
                    description: Description::parse(format!("session {i}")).unwrap(),
                    duration: Minutes::new((i % 120) as u32),
                    date: ExerciseDate::new(base + chrono::Duration::days((i % 365) as i64)),
                },
            )
        })
        .collect()
}

fn bench_date_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_filter_date_range");

    for len in [10usize, 1_000, 100_000] {
        let entries = build_log(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &entries, |b, entries| {
            b.iter(|| {
                black_box(filter_log(
                    black_box(entries),
                    Some("2024-03-01"),
                    Some("2024-09-30"),
                    None,
                ))
            });
        });
    }

    group.finish();
}

fn bench_limit_short_circuits(c: &mut Criterion) {
    let entries = build_log(100_000);
    let filter = LogFilter::lenient(None, None, Some("10"));

    c.bench_function("log_filter_limit_10_of_100k", |b| {
        b.iter(|| black_box(filter.apply(black_box(&entries))));
    });
}

criterion_group!(benches, bench_date_range, bench_limit_short_circuits);
criterion_main!(benches);
