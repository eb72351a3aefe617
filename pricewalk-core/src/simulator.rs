//! Trajectory simulator: transition probabilities + seed window → future values.
//!
//! Each step makes one weighted draw over `[Increase, Same, Decrease]` and
//! moves the current value by `+step_size`, `0` or `-step_size`. Before the
//! draw the weights are adjusted: INCREASE is pinned to 1 and the SAME and
//! DECREASE probabilities are each divided by 2. The adjusted weights are used
//! as relative weights, so the estimated SAME/DECREASE probabilities only
//! matter in proportion to each other and to the fixed INCREASE weight.
//!
//! The simulator carries no label between steps; only the current value and
//! the window matter.

use std::collections::VecDeque;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::State;
use crate::error::{PredictError, Result};
use crate::estimator::TransitionProbabilities;
use crate::rng::SeedHierarchy;

/// Weight INCREASE is pinned to before every draw.
const INCREASE_WEIGHT: f64 = 1.0;

/// SAME and DECREASE are divided by the number of entries after INCREASE.
const REMAINING_ENTRIES: f64 = 2.0;

/// Simulator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Seed window length K.
    pub window_len: usize,
    /// Price units moved per INCREASE/DECREASE step.
    pub step_size: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            window_len: 60,
            step_size: 5.0,
        }
    }
}

/// The last K values of a run, shifted as new values are generated.
///
/// Always holds exactly `capacity` values. Built from a copy of the caller's
/// seed, never a reference to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationWindow {
    values: VecDeque<f64>,
}

impl SimulationWindow {
    /// Copy `seed` into a new window; its length must equal `window_len`.
    pub fn from_seed(seed: &[f64], window_len: usize) -> Result<Self> {
        if window_len == 0 {
            return Err(PredictError::invalid("window length must be at least 1"));
        }
        if seed.len() != window_len {
            return Err(PredictError::invalid(format!(
                "seed window must have exactly {window_len} values, got {}",
                seed.len()
            )));
        }
        if let Some(bad) = seed.iter().find(|v| !v.is_finite()) {
            return Err(PredictError::invalid(format!(
                "seed window contains non-finite value {bad}"
            )));
        }
        Ok(Self {
            values: seed.iter().copied().collect(),
        })
    }

    /// Drop the oldest value and append `value`.
    pub fn push(&mut self, value: f64) {
        self.values.pop_front();
        self.values.push_back(value);
    }

    /// Most recent value.
    pub fn latest(&self) -> f64 {
        // from_seed rejects empty windows and push keeps the length
        self.values.back().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}

/// Adjusted sampling weights in `[Increase, Same, Decrease]` order.
pub fn sampling_weights(probabilities: &TransitionProbabilities) -> [f64; 3] {
    [
        INCREASE_WEIGHT,
        probabilities.same() / REMAINING_ENTRIES,
        probabilities.decrease() / REMAINING_ENTRIES,
    ]
}

/// Draw one state with `weights` as relative weights.
///
/// `weights` must be built from the three entries of [`sampling_weights`].
pub fn draw_state<R: Rng + ?Sized>(weights: &WeightedIndex<f64>, rng: &mut R) -> State {
    State::ALL[weights.sample(rng)]
}

fn weighted_index(probabilities: &TransitionProbabilities) -> Result<WeightedIndex<f64>> {
    WeightedIndex::new(sampling_weights(probabilities))
        .map_err(|e| PredictError::invalid(format!("unusable sampling weights: {e}")))
}

/// Simulate `horizon` future values following `seed_window`.
///
/// Fails with `InvalidInput` when `horizon` is zero or the seed window length
/// differs from `config.window_len`. Output is deterministic for a seeded
/// `rng`.
pub fn simulate<R: Rng + ?Sized>(
    probabilities: &TransitionProbabilities,
    seed_window: &[f64],
    horizon: usize,
    config: &SimulatorConfig,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if horizon == 0 {
        return Err(PredictError::invalid("horizon must be at least 1"));
    }
    if !config.step_size.is_finite() {
        return Err(PredictError::invalid(format!(
            "step size must be finite, got {}",
            config.step_size
        )));
    }
    let mut window = SimulationWindow::from_seed(seed_window, config.window_len)?;
    let weights = weighted_index(probabilities)?;

    let mut trajectory = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let state = draw_state(&weights, rng);
        let next = window.latest() + state.delta(config.step_size);
        trajectory.push(next);
        window.push(next);
    }

    tracing::debug!(
        horizon,
        window_len = window.len(),
        start = seed_window[seed_window.len() - 1],
        end = window.latest(),
        "simulated trajectory"
    );
    Ok(trajectory)
}

/// Simulate `paths` independent trajectories in parallel.
///
/// Path `i` uses the RNG derived from `(symbol, i)`, so the result does not
/// depend on the thread count.
pub fn simulate_paths(
    probabilities: &TransitionProbabilities,
    seed_window: &[f64],
    horizon: usize,
    config: &SimulatorConfig,
    seeds: &SeedHierarchy,
    symbol: &str,
    paths: usize,
) -> Result<Vec<Vec<f64>>> {
    if paths == 0 {
        return Err(PredictError::invalid("path count must be at least 1"));
    }
    (0..paths)
        .into_par_iter()
        .map(|path| {
            let mut rng = seeds.path_rng(symbol, path as u64);
            simulate(probabilities, seed_window, horizon, config, &mut rng)
        })
        .collect()
}

/// Step-wise mean across trajectories.
///
/// All paths must have the same length; ragged input fails with
/// `InvalidInput`. No paths gives an empty mean.
pub fn mean_path(paths: &[Vec<f64>]) -> Result<Vec<f64>> {
    let Some(first) = paths.first() else {
        return Ok(Vec::new());
    };
    let steps = first.len();
    if let Some((i, p)) = paths.iter().enumerate().find(|(_, p)| p.len() != steps) {
        return Err(PredictError::invalid(format!(
            "path {i} has {} steps, path 0 has {steps}",
            p.len()
        )));
    }
    let n = paths.len() as f64;
    Ok((0..steps)
        .map(|step| paths.iter().map(|p| p[step]).sum::<f64>() / n)
        .collect())
}

/// Simulation entry point bound to one validated [`SimulatorConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Fails with `InvalidInput` for a zero window or a non-finite step size.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        if config.window_len == 0 {
            return Err(PredictError::invalid("window length must be at least 1"));
        }
        if !config.step_size.is_finite() {
            return Err(PredictError::invalid(format!(
                "step size must be finite, got {}",
                config.step_size
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// See [`simulate`].
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        probabilities: &TransitionProbabilities,
        seed_window: &[f64],
        horizon: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        simulate(probabilities, seed_window, horizon, &self.config, rng)
    }

    /// See [`simulate_paths`].
    pub fn simulate_paths(
        &self,
        probabilities: &TransitionProbabilities,
        seed_window: &[f64],
        horizon: usize,
        seeds: &SeedHierarchy,
        symbol: &str,
        paths: usize,
    ) -> Result<Vec<Vec<f64>>> {
        simulate_paths(probabilities, seed_window, horizon, &self.config, seeds, symbol, paths)
    }
}
