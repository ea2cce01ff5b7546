//! Criterion benchmarks for tariffscope_core recomputation
//!
//! Run with: cargo bench -p tariffscope_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tariffscope_core::model::{Grid, Metadata, Table};
use tariffscope_core::pairing::{Filters, apply_filters, extract_pairs};
use tariffscope_core::simulation::{SimulationParams, simulate};
use tariffscope_core::{ReferenceMode, Selections, recompute};

/// A synthetic tariff with `groups` job groups and `steps` pay steps
fn create_table(name: &str, groups: usize, steps: usize, base: f64) -> Table {
    let step_ids: Vec<String> = (1..=steps).map(|s| s.to_string()).collect();
    let mut grid = Grid::with_steps(step_ids.clone());
    let mut durations = Grid::with_steps(step_ids);
    for g in 1..=groups {
        let values = (1..=steps)
            .map(|s| format!("{:.2}", base + g as f64 * 180.0 + s as f64 * 95.5))
            .collect();
        grid.insert_row(format!("E{g}"), values);
        durations.insert_row(
            format!("E{g}"),
            (1..=steps).map(|s| (s.min(5)).to_string()).collect(),
        );
    }
    let metadata: Metadata = [("version", name), ("jsz_percent", "60")].into_iter().collect();
    Table::new(name, grid, durations, metadata)
}

fn bench_extract_pairs(c: &mut Criterion) {
    let a = create_table("A", 15, 6, 2400.0);
    let b = create_table("B", 15, 6, 2450.0);

    c.bench_function("extract_pairs_15x6", |bench| {
        bench.iter(|| extract_pairs(black_box(&a), black_box(&b)))
    });

    let filters = Filters {
        group_from: Some(5.0),
        explicit_groups: "5,6,9,13".to_string(),
        ..Default::default()
    };
    c.bench_function("extract_and_filter_15x6", |bench| {
        bench.iter(|| apply_filters(extract_pairs(&a, &b), black_box(&filters)))
    });
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");

    for groups in [5, 15, 40].iter() {
        let a = create_table("A", *groups, 8, 2400.0);
        let b = create_table("B", *groups, 8, 2450.0);
        let mut selections = Selections::for_pair("A", "B");
        selections.argument_mode = true;

        group.bench_with_input(BenchmarkId::new("groups", groups), groups, |bench, _| {
            bench.iter(|| recompute(black_box(&a), black_box(&b), black_box(&selections)))
        });
    }

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let a = create_table("A", 1, 8, 3000.0);
    let b = create_table("B", 1, 8, 3100.0);
    let cells = extract_pairs(&a, &b);
    let refs: Vec<_> = cells.iter().collect();

    let mut group = c.benchmark_group("simulation");
    for years in [10, 40].iter() {
        let params = SimulationParams {
            years: *years,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("years", years), years, |bench, _| {
            bench.iter(|| simulate(black_box(&refs), &a, &a.metadata, &b.metadata, &params))
        });
    }
    group.finish();

    // Reference mode flips only the sign; both should cost the same.
    let mut selections = Selections::for_pair("A", "B");
    selections.reference = ReferenceMode::BMinusA;
    c.bench_function("recompute_single_group_b_minus_a", |bench| {
        bench.iter(|| recompute(&a, &b, black_box(&selections)))
    });
}

criterion_group!(benches, bench_extract_pairs, bench_recompute, bench_simulation);
criterion_main!(benches);
