//! Prediction pipeline — wires classifier, estimator and simulator together.
//!
//! Two entry points:
//! - `Predictor::predict()`: takes a pre-loaded series. No I/O.
//! - `Predictor::predict_from_source()`: selects the lookback window from a
//!   [`SeriesSource`] first. Used by the CLI.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classifier::classify;
use crate::config::PredictorConfig;
use crate::data::{dataset_hash, lookback_range, DataError, SeriesSource};
use crate::domain::{LabeledObservation, Observation};
use crate::error::{PredictError, Result};
use crate::estimator::{
    count_transitions, estimate_matrix, estimate_with, EstimatorMode, TransitionCounts,
    TransitionMatrix, TransitionProbabilities,
};
use crate::rng::SeedHierarchy;
use crate::simulator::{mean_path, Simulator};

/// Current schema version for exported predictions.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Estimated transition model for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub mode: EstimatorMode,
    pub transitions: usize,
    /// Ordinal bucket counts (always computed, for continuity with older reports).
    pub counts: TransitionCounts,
    /// Pairwise matrix, present in pairwise mode.
    pub matrix: Option<TransitionMatrix>,
    /// Vector handed to the simulator.
    pub probabilities: TransitionProbabilities,
}

/// Complete result of one prediction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub config: PredictorConfig,
    /// Master seed actually used (drawn from entropy when the config has none).
    pub master_seed: u64,
    pub dataset_hash: String,
    pub observed: Vec<Observation>,
    pub transitions: TransitionReport,
    /// Predicted series: the single path, or the step-wise mean of all paths.
    pub predicted: Vec<Observation>,
    /// Every simulated trajectory.
    pub paths: Vec<Vec<f64>>,
}

/// Runs the model with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Predictor {
    config: PredictorConfig,
}

impl Predictor {
    pub fn new(config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Classify `series` and estimate its transition model.
    pub fn transitions(&self, series: &[Observation]) -> Result<TransitionReport> {
        let labeled = classify(series)?;
        self.report(&labeled)
    }

    fn report(&self, labeled: &[LabeledObservation]) -> Result<TransitionReport> {
        let counts = count_transitions(labeled)?;
        let matrix = match self.config.estimator {
            EstimatorMode::Ordinal => None,
            EstimatorMode::Pairwise => Some(estimate_matrix(labeled)?),
        };
        let probabilities = estimate_with(self.config.estimator, labeled)?;
        Ok(TransitionReport {
            mode: self.config.estimator,
            transitions: counts.total(),
            counts,
            matrix,
            probabilities,
        })
    }

    /// Predict `horizon` values following `series`.
    ///
    /// Randomness comes from `config.seed`, or from OS entropy when unset; the
    /// seed used is recorded in the result.
    pub fn predict(&self, symbol: &str, series: &[Observation]) -> Result<Prediction> {
        let seeds = self
            .config
            .seed
            .map(SeedHierarchy::new)
            .unwrap_or_else(SeedHierarchy::from_entropy);
        self.predict_with_seeds(symbol, series, &seeds)
    }

    /// Predict with an explicit seed hierarchy, ignoring `config.seed`.
    ///
    /// The seed window is the last `window_len` observed values; a shorter
    /// series fails with `InsufficientData`.
    pub fn predict_with_seeds(
        &self,
        symbol: &str,
        series: &[Observation],
        seeds: &SeedHierarchy,
    ) -> Result<Prediction> {
        let labeled = classify(series)?;
        let transitions = self.report(&labeled)?;

        let k = self.config.window_len;
        if series.len() < k {
            return Err(PredictError::InsufficientData {
                needed: k,
                got: series.len(),
                what: "observations for the seed window",
            });
        }
        let seed_window: Vec<f64> = series[series.len() - k..].iter().map(|o| o.value).collect();

        let simulator = Simulator::new(self.config.simulator())?;
        let paths = simulator.simulate_paths(
            &transitions.probabilities,
            &seed_window,
            self.config.horizon,
            seeds,
            symbol,
            self.config.paths,
        )?;
        let values = if paths.len() == 1 {
            paths[0].clone()
        } else {
            mean_path(&paths)?
        };

        // validated above: series is at least window_len >= 1 long
        let last_date = series[series.len() - 1].date;
        let predicted = future_dates(last_date, values.len())?
            .into_iter()
            .zip(values)
            .map(|(date, value)| Observation::new(date, value))
            .collect();

        tracing::info!(
            symbol,
            observed = series.len(),
            horizon = self.config.horizon,
            paths = paths.len(),
            probabilities = ?transitions.probabilities.as_array(),
            "prediction complete"
        );

        Ok(Prediction {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.to_string(),
            config: self.config.clone(),
            master_seed: seeds.master_seed(),
            dataset_hash: dataset_hash(series),
            observed: series.to_vec(),
            transitions,
            predicted,
            paths,
        })
    }

    /// Fetch the lookback window ending at `cutoff`, then predict.
    pub fn predict_from_source(
        &self,
        source: &dyn SeriesSource,
        symbol: &str,
        cutoff: NaiveDate,
    ) -> Result<Prediction> {
        let series = self.load(source, symbol, cutoff)?;
        self.predict(symbol, &series)
    }

    /// Fetch the lookback window ending at `cutoff`.
    pub fn load(
        &self,
        source: &dyn SeriesSource,
        symbol: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let (start, end) = lookback_range(cutoff, self.config.lookback_days);
        let series = source.fetch(symbol, start, end)?;
        tracing::debug!(
            source = source.name(),
            symbol,
            %start,
            %end,
            observations = series.len(),
            "selected lookback window"
        );
        if series.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
                start,
                end,
            }
            .into());
        }
        Ok(series)
    }
}

/// Sequential calendar days after `last`.
///
/// Fails with `InvalidInput` when the horizon runs past `NaiveDate::MAX`.
fn future_dates(last: NaiveDate, n: usize) -> Result<Vec<NaiveDate>> {
    (1..=n as i64)
        .map(|i| {
            last.checked_add_signed(Duration::days(i)).ok_or_else(|| {
                PredictError::invalid(format!(
                    "cannot date {n} steps after {last}: past the end of the calendar"
                ))
            })
        })
        .collect()
}
