use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ql_math::{RandomVariable, TimeGrid};
use ql_methods::{AssetModelMonteCarloSimulation, MonteCarloBlackScholesModel};
use ql_processes::ModelModifications;

// Cost of the first query (full simulation) and of deriving modified copies.

fn simulation(paths: usize, steps: usize) -> MonteCarloBlackScholesModel {
    let grid = TimeGrid::uniform(0.0, steps, 1.0 / steps as f64).expect("valid grid");
    MonteCarloBlackScholesModel::with_time_grid(grid, paths, 100.0, 0.05, 0.2)
        .expect("valid simulation")
}

fn bench_first_query_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_query_paths");
    for paths in [1_000, 10_000, 50_000] {
        group.bench_with_input(BenchmarkId::from_parameter(paths), &paths, |b, &paths| {
            b.iter(|| {
                let sim = simulation(paths, 12);
                let terminal = sim.asset_value(12, 0).expect("simulation succeeds");
                black_box(terminal.expectation())
            })
        });
    }
    group.finish();
}

fn bench_first_query_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_query_steps");
    for steps in [12, 52, 252] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| {
                let sim = simulation(10_000, steps);
                black_box(sim.asset_value(steps, 0).expect("simulation succeeds"))
            })
        });
    }
    group.finish();
}

fn bench_bumped_clone(c: &mut Criterion) {
    let sim = simulation(10_000, 52);
    sim.asset_value(52, 0).expect("simulation succeeds");
    let bump = ModelModifications::new().with_volatility(0.21);
    c.bench_function("bumped_clone_common_random_numbers", |b| {
        b.iter(|| {
            let bumped = sim.clone_with_modified_data(black_box(&bump)).expect("valid bump");
            black_box(bumped.asset_value(52, 0).expect("simulation succeeds"))
        })
    });
}

criterion_group!(
    benches,
    bench_first_query_paths,
    bench_first_query_steps,
    bench_bumped_clone
);
criterion_main!(benches);
