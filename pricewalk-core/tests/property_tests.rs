//! Property tests for model invariants.
//!
//! Uses proptest to verify:
//! 1. Classification — same length, first label SAME
//! 2. Estimation — probabilities non-negative and sum to one
//! 3. Simulation — exact horizon, bounded steps, seeded determinism
//! 4. Pairwise matrix — every populated row sums to one

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use pricewalk_core::{
    classify, estimate, estimate_matrix, simulate, simulate_paths, Observation, SeedHierarchy,
    SimulatorConfig, State, TransitionProbabilities,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_prices(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    // integer-ish prices so SAME labels actually occur
    prop::collection::vec((90u32..110).prop_map(f64::from), min_len..200)
}

fn arb_probabilities() -> impl Strategy<Value = TransitionProbabilities> {
    (0u32..=100, 0u32..=100, 0u32..=100)
        .prop_filter("non-zero total", |(a, b, c)| a + b + c > 0)
        .prop_map(|(a, b, c)| {
            let total = f64::from(a + b + c);
            TransitionProbabilities::new(
                f64::from(a) / total,
                f64::from(b) / total,
                f64::from(c) / total,
            )
            .unwrap()
        })
}

fn to_series(values: &[f64]) -> Vec<Observation> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Observation::new(base + Duration::days(i as i64), v))
        .collect()
}

// ── 1. Classification ────────────────────────────────────────────────

proptest! {
    #[test]
    fn classify_preserves_length_and_starts_same(values in arb_prices(1)) {
        let labeled = classify(&to_series(&values)).unwrap();
        prop_assert_eq!(labeled.len(), values.len());
        prop_assert_eq!(labeled[0].state, State::Same);
        for (i, l) in labeled.iter().enumerate().skip(1) {
            prop_assert_eq!(l.state, State::between(values[i - 1], values[i]));
        }
    }
}

// ── 2. Estimation ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn estimate_is_a_distribution(values in arb_prices(2)) {
        let labeled = classify(&to_series(&values)).unwrap();
        let p = estimate(&labeled).unwrap().as_array();
        prop_assert!(p.iter().all(|x| *x >= 0.0));
        prop_assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pairwise_rows_are_distributions(values in arb_prices(2)) {
        let labeled = classify(&to_series(&values)).unwrap();
        let matrix = estimate_matrix(&labeled).unwrap();
        prop_assert_eq!(matrix.total(), values.len() - 1);
        for state in State::ALL {
            if let Some(row) = matrix.row(state) {
                prop_assert!((row.as_array().iter().sum::<f64>() - 1.0).abs() < 1e-9);
            }
        }
    }
}

// ── 3. Simulation ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn simulate_returns_horizon_bounded_steps(
        p in arb_probabilities(),
        seed in any::<u64>(),
        horizon in 1usize..100,
        window in prop::collection::vec(50.0..150.0_f64, 1..20),
    ) {
        let config = SimulatorConfig { window_len: window.len(), step_size: 5.0 };
        let before = window.clone();
        let out = simulate(&p, &window, horizon, &config, &mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(out.len(), horizon);
        prop_assert_eq!(&window, &before);

        let mut previous = window[window.len() - 1];
        for value in out {
            let delta: f64 = value - previous;
            prop_assert!(delta.abs() < 1e-9 || (delta.abs() - 5.0).abs() < 1e-9);
            previous = value;
        }
    }

    #[test]
    fn simulate_is_deterministic_under_seed(
        p in arb_probabilities(),
        seed in any::<u64>(),
        horizon in 1usize..50,
    ) {
        let window = vec![100.0; 10];
        let config = SimulatorConfig { window_len: 10, step_size: 5.0 };
        let a = simulate(&p, &window, horizon, &config, &mut StdRng::seed_from_u64(seed)).unwrap();
        let b = simulate(&p, &window, horizon, &config, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn parallel_paths_match_sequential(
        p in arb_probabilities(),
        master in any::<u64>(),
        paths in 1usize..12,
    ) {
        let window = vec![100.0; 4];
        let config = SimulatorConfig { window_len: 4, step_size: 1.0 };
        let seeds = SeedHierarchy::new(master);
        let parallel = simulate_paths(&p, &window, 8, &config, &seeds, "ASX200", paths).unwrap();
        for (i, path) in parallel.iter().enumerate() {
            let mut rng = seeds.path_rng("ASX200", i as u64);
            let sequential = simulate(&p, &window, 8, &config, &mut rng).unwrap();
            prop_assert_eq!(path, &sequential);
        }
    }
}
