//! PriceWalk Core — Markov-chain short-horizon price walk.
//!
//! This crate contains the model and its plumbing:
//! - Domain types (observations, movement states)
//! - State classifier: series → INCREASE / SAME / DECREASE labels
//! - Transition estimator: ordinal buckets or a pairwise 3x3 matrix
//! - Trajectory simulator: weighted draws over a shifting seed window
//! - Seed hierarchy for reproducible parallel paths
//! - Series sources (CSV, in-memory), lookback selection, export

pub mod classifier;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod export;
pub mod predictor;
pub mod rng;
pub mod simulator;

pub use classifier::{classify, classify_values};
pub use config::{ConfigError, PredictorConfig};
pub use domain::{LabeledObservation, Observation, State};
pub use error::PredictError;
pub use estimator::{
    count_transitions, estimate, estimate_matrix, estimate_with, EstimatorMode, TransitionCounts,
    TransitionMatrix, TransitionProbabilities,
};
pub use predictor::{Prediction, Predictor, TransitionReport, SCHEMA_VERSION};
pub use rng::SeedHierarchy;
pub use simulator::{
    mean_path, simulate, simulate_paths, SimulationWindow, Simulator, SimulatorConfig,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed between sessions or threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Observation>();
        require_sync::<Observation>();
        require_send::<LabeledObservation>();
        require_sync::<LabeledObservation>();
        require_send::<State>();
        require_sync::<State>();
        require_send::<TransitionProbabilities>();
        require_sync::<TransitionProbabilities>();
        require_send::<TransitionMatrix>();
        require_sync::<TransitionMatrix>();
        require_send::<SimulationWindow>();
        require_sync::<SimulationWindow>();
        require_send::<SeedHierarchy>();
        require_sync::<SeedHierarchy>();
        require_send::<PredictorConfig>();
        require_sync::<PredictorConfig>();
        require_send::<Predictor>();
        require_sync::<Predictor>();
        require_send::<Prediction>();
        require_sync::<Prediction>();
        require_send::<PredictError>();
        require_sync::<PredictError>();
        require_send::<data::CsvSource>();
        require_sync::<data::CsvSource>();
        require_send::<Simulator>();
        require_sync::<Simulator>();
    }

    /// The simulator takes its randomness as a parameter, never from ambient state.
    #[test]
    fn simulator_takes_explicit_rng() {
        fn _check<R: rand::Rng>(
            p: &TransitionProbabilities,
            seed: &[f64],
            config: &SimulatorConfig,
            rng: &mut R,
        ) -> Result<Vec<f64>, PredictError> {
            simulate(p, seed, 1, config, rng)
        }
    }
}
