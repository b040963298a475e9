use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridwatch::data::{Header, Row, SourceId};
use gridwatch::diff::diff;
use gridwatch::snapshot::TableData;

/// Create a snapshot with deterministic content. Rows whose index is a
/// multiple of ten change value between ticks, so consecutive ticks
/// diff with ~10% churn.
fn create_snapshot(num_rows: usize, tick: usize) -> TableData {
    let rows = (0..num_rows)
        .map(|i| {
            let value = if i % 10 == 0 {
                format!("v{}_{}", i, tick)
            } else {
                format!("v{}", i)
            };
            Row::new(
                format!("row_{}", i),
                vec![format!("name_{}", i), value, format!("{}s", i % 900)],
            )
        })
        .collect();

    TableData::from_rows(
        SourceId::new("bench/v1"),
        "all",
        Header::from_names(&["NAME", "VALUE", "AGE"]),
        rows,
    )
}

/// Benchmark the first diff, with no baseline (everything comes back Added).
fn bench_initial_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_diff");

    for num_rows in [1_000, 10_000, 100_000] {
        let next = create_snapshot(num_rows, 0);

        group.bench_with_input(BenchmarkId::new("rows", num_rows), &next, |b, next| {
            b.iter(|| {
                let events = diff(None, black_box(next));
                black_box(events)
            });
        });
    }

    group.finish();
}

/// Benchmark steady-state diffs where ~10% of rows changed in place.
fn bench_steady_state_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("steady_state_diff");

    for num_rows in [1_000, 10_000, 100_000] {
        let prev = create_snapshot(num_rows, 0);
        let next = create_snapshot(num_rows, 1);

        group.bench_with_input(
            BenchmarkId::new("rows", num_rows),
            &(prev, next),
            |b, (prev, next)| {
                b.iter(|| {
                    let events = diff(Some(black_box(prev)), black_box(next));
                    black_box(events)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark diffs with row turnover: 10% of ids vanish and as many new
/// ones appear, exercising the Deleted fade-out path.
fn bench_turnover_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("turnover_diff");

    for num_rows in [1_000, 10_000, 100_000] {
        let prev = create_snapshot(num_rows, 0);
        let shift = num_rows / 10;
        let next_rows = (shift..num_rows + shift)
            .map(|i| Row::new(format!("row_{}", i), vec![format!("name_{}", i), format!("v{}", i), "1s".into()]))
            .collect();
        let next = TableData::from_rows(
            SourceId::new("bench/v1"),
            "all",
            Header::from_names(&["NAME", "VALUE", "AGE"]),
            next_rows,
        );

        group.bench_with_input(
            BenchmarkId::new("rows", num_rows),
            &(prev, next),
            |b, (prev, next)| {
                b.iter(|| {
                    let events = diff(Some(black_box(prev)), black_box(next));
                    black_box(events)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_initial_diff,
    bench_steady_state_diff,
    bench_turnover_diff
);
criterion_main!(benches);
