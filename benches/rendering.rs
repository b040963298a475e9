use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridwatch::data::{Header, HeaderColumn, Row, SourceId};
use gridwatch::render::calculate_auto_widths;
use gridwatch::snapshot::TableData;
use gridwatch::table::Table;

/// Create a snapshot with ~10% of values changing between ticks.
fn create_snapshot(num_rows: usize, tick: usize) -> TableData {
    let rows = (0..num_rows)
        .map(|i| {
            let cpu = if i % 10 == 0 {
                format!("{}.{}%", (i + tick) % 100, tick % 10)
            } else {
                format!("{}.0%", i % 100)
            };
            Row::new(
                format!("row_{}", i),
                vec![format!("proc_{:07}", i), cpu, format!("{}m", i % 600)],
            )
        })
        .collect();

    TableData::from_rows(
        SourceId::new("bench/v1"),
        "all",
        Header::new(vec![
            HeaderColumn::new("NAME"),
            HeaderColumn::new("CPU%").numeric(),
            HeaderColumn::new("AGE").duration(),
        ]),
        rows,
    )
}

/// Seed a table with a baseline snapshot applied.
fn seeded_table(num_rows: usize) -> Table {
    let mut table = Table::new(SourceId::new("bench/v1"));
    let first = create_snapshot(num_rows, 0);
    let view = table.update(&first, false);
    table.update_ui(view, first);
    table
}

/// Benchmark the pure compute phase: diff against the baseline, sort,
/// resolve visible columns. No grid writes.
fn bench_compute_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_phase");

    for num_rows in [1_000, 10_000, 100_000] {
        let table = seeded_table(num_rows);
        let next = create_snapshot(num_rows, 1);

        group.bench_with_input(BenchmarkId::new("rows", num_rows), &next, |b, next| {
            b.iter(|| {
                let view = table.update(black_box(next), false);
                black_box(view)
            });
        });
    }

    group.finish();
}

/// Benchmark a full refresh: compute plus grid rebuild, alternating
/// between two ticks the way a live feed would.
fn bench_full_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_refresh");

    for num_rows in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("rows", num_rows),
            &num_rows,
            |b, &num_rows| {
                let mut table = seeded_table(num_rows);
                let snaps = [create_snapshot(num_rows, 0), create_snapshot(num_rows, 1)];
                let mut tick = 0usize;

                b.iter(|| {
                    tick += 1;
                    let next = snaps[tick % 2].clone();
                    let view = table.update(&next, false);
                    table.update_ui(view, next);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark column width calculation over the rebuilt grid.
fn bench_column_width_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_width_calculation");

    for num_rows in [1_000, 10_000, 100_000] {
        let table = seeded_table(num_rows);

        group.bench_with_input(
            BenchmarkId::new("rows", num_rows),
            table.grid(),
            |b, grid| {
                b.iter(|| {
                    let widths = calculate_auto_widths(black_box(grid));
                    black_box(widths)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_phase,
    bench_full_refresh,
    bench_column_width_calculation
);
criterion_main!(benches);
