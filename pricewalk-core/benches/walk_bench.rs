//! Criterion benchmarks for PriceWalk hot paths.
//!
//! Benchmarks:
//! 1. Classification of a long series
//! 2. Ordinal and pairwise estimation
//! 3. Single-path simulation across horizons
//! 4. Parallel multi-path simulation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use pricewalk_core::{
    classify, estimate, estimate_matrix, simulate, simulate_paths, Observation, SeedHierarchy,
    SimulatorConfig, TransitionProbabilities,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> Vec<Observation> {
    let base = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let value = (100.0 + (i as f64 * 0.1).sin() * 10.0).round();
            Observation::new(base + chrono::Duration::days(i as i64), value)
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let series = make_series(10_000);
    c.bench_function("classify_10k", |b| {
        b.iter(|| classify(black_box(&series)).unwrap())
    });
}

fn bench_estimate(c: &mut Criterion) {
    let labeled = classify(&make_series(10_000)).unwrap();
    c.bench_function("estimate_ordinal_10k", |b| {
        b.iter(|| estimate(black_box(&labeled)).unwrap())
    });
    c.bench_function("estimate_pairwise_10k", |b| {
        b.iter(|| estimate_matrix(black_box(&labeled)).unwrap())
    });
}

fn bench_simulate(c: &mut Criterion) {
    let p = TransitionProbabilities::new(0.4, 0.2, 0.4).unwrap();
    let config = SimulatorConfig::default();
    let window = vec![100.0; config.window_len];

    let mut group = c.benchmark_group("simulate");
    for horizon in [10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(horizon), &horizon, |b, &h| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| simulate(&p, black_box(&window), h, &config, &mut rng).unwrap())
        });
    }
    group.finish();
}

fn bench_simulate_paths(c: &mut Criterion) {
    let p = TransitionProbabilities::new(0.4, 0.2, 0.4).unwrap();
    let config = SimulatorConfig::default();
    let window = vec![100.0; config.window_len];
    let seeds = SeedHierarchy::new(42);
    c.bench_function("simulate_paths_1000x30", |b| {
        b.iter(|| {
            simulate_paths(&p, black_box(&window), 30, &config, &seeds, "BENCH", 1_000).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_estimate,
    bench_simulate,
    bench_simulate_paths
);
criterion_main!(benches);
