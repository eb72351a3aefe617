//! Transition estimator: labeled series → transition probabilities.
//!
//! Two modes:
//! - **Ordinal** (default): each consecutive label pair is bucketed by
//!   comparing the labels' textual forms (`"DECREASE" < "INCREASE" < "SAME"`).
//!   A later label that sorts after the earlier one counts as INCREASE, one
//!   that sorts before counts as DECREASE, an equal one counts as SAME. This
//!   does not correspond to a conventional transition matrix, but existing
//!   predictions depend on it.
//! - **Pairwise**: a first-order 3x3 matrix of `(from, to)` counts,
//!   normalized per source state.
//!
//! Both modes recompute from the complete labeled series on every call.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::{LabeledObservation, State};
use crate::error::{PredictError, Result};

/// Tolerance used when validating that a probability vector sums to one.
const SUM_TOLERANCE: f64 = 1e-6;

/// Which estimation rule to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorMode {
    #[default]
    Ordinal,
    Pairwise,
}

impl std::str::FromStr for EstimatorMode {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ordinal" => Ok(EstimatorMode::Ordinal),
            "pairwise" => Ok(EstimatorMode::Pairwise),
            other => Err(PredictError::invalid(format!(
                "unknown estimator mode '{other}' (expected ordinal or pairwise)"
            ))),
        }
    }
}

/// Raw bucket counts in `[Increase, Same, Decrease]` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCounts {
    pub buckets: [usize; 3],
}

impl TransitionCounts {
    pub fn record(&mut self, bucket: State) {
        self.buckets[bucket.index()] += 1;
    }

    pub fn get(&self, bucket: State) -> usize {
        self.buckets[bucket.index()]
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().sum()
    }

    /// Normalize into probabilities. `None` when no transitions were recorded.
    pub fn probabilities(&self) -> Option<TransitionProbabilities> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some(TransitionProbabilities(
            self.buckets.map(|count| count as f64 / total),
        ))
    }
}

/// Probability vector `(p_increase, p_same, p_decrease)`.
///
/// Entries are finite, non-negative and sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TransitionProbabilities([f64; 3]);

impl TransitionProbabilities {
    pub fn new(increase: f64, same: f64, decrease: f64) -> Result<Self> {
        Self::try_from([increase, same, decrease].as_slice())
    }

    pub fn get(&self, state: State) -> f64 {
        self.0[state.index()]
    }

    pub fn increase(&self) -> f64 {
        self.0[0]
    }

    pub fn same(&self) -> f64 {
        self.0[1]
    }

    pub fn decrease(&self) -> f64 {
        self.0[2]
    }

    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }
}

impl TryFrom<&[f64]> for TransitionProbabilities {
    type Error = PredictError;

    fn try_from(values: &[f64]) -> Result<Self> {
        let entries: [f64; 3] = values.try_into().map_err(|_| {
            PredictError::invalid(format!(
                "probability vector must have exactly 3 entries, got {}",
                values.len()
            ))
        })?;
        if entries.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(PredictError::invalid(format!(
                "probabilities must be finite and non-negative: {entries:?}"
            )));
        }
        let sum: f64 = entries.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(PredictError::invalid(format!(
                "probabilities must sum to 1, got {sum}"
            )));
        }
        Ok(Self(entries))
    }
}

impl TryFrom<Vec<f64>> for TransitionProbabilities {
    type Error = PredictError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::try_from(values.as_slice())
    }
}

impl From<TransitionProbabilities> for Vec<f64> {
    fn from(p: TransitionProbabilities) -> Self {
        p.0.to_vec()
    }
}

/// First-order `(from, to)` transition counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    /// `counts[from][to]`, both indexed in `[Increase, Same, Decrease]` order.
    pub counts: [[usize; 3]; 3],
}

impl TransitionMatrix {
    pub fn count(&self, from: State, to: State) -> usize {
        self.counts[from.index()][to.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Outgoing distribution from `from`. `None` if the state was never left.
    pub fn row(&self, from: State) -> Option<TransitionProbabilities> {
        TransitionCounts {
            buckets: self.counts[from.index()],
        }
        .probabilities()
    }
}

/// Ordinal bucket for a consecutive label pair.
fn ordinal_bucket(current: State, next: State) -> State {
    match next.as_str().cmp(current.as_str()) {
        Ordering::Greater => State::Increase,
        Ordering::Less => State::Decrease,
        Ordering::Equal => State::Same,
    }
}

fn require_transitions(labeled: &[LabeledObservation]) -> Result<()> {
    if labeled.len() < 2 {
        return Err(PredictError::InsufficientData {
            needed: 2,
            got: labeled.len(),
            what: "labeled observations",
        });
    }
    Ok(())
}

/// Ordinal bucket counts over all consecutive pairs.
pub fn count_transitions(labeled: &[LabeledObservation]) -> Result<TransitionCounts> {
    require_transitions(labeled)?;
    let mut counts = TransitionCounts::default();
    for pair in labeled.windows(2) {
        counts.record(ordinal_bucket(pair[0].state, pair[1].state));
    }
    Ok(counts)
}

/// Estimate the probability vector with the ordinal rule.
///
/// Fails with `InsufficientData` for fewer than two labeled observations.
pub fn estimate(labeled: &[LabeledObservation]) -> Result<TransitionProbabilities> {
    let counts = count_transitions(labeled)?;
    let probabilities = counts.probabilities().ok_or(PredictError::InsufficientData {
        needed: 1,
        got: 0,
        what: "transitions",
    })?;
    tracing::debug!(
        transitions = counts.total(),
        buckets = ?counts.buckets,
        probabilities = ?probabilities.as_array(),
        "estimated ordinal transition probabilities"
    );
    Ok(probabilities)
}

/// Estimate the conventional `(from, to)` transition matrix.
pub fn estimate_matrix(labeled: &[LabeledObservation]) -> Result<TransitionMatrix> {
    require_transitions(labeled)?;
    let mut matrix = TransitionMatrix::default();
    for pair in labeled.windows(2) {
        matrix.counts[pair[0].state.index()][pair[1].state.index()] += 1;
    }
    tracing::debug!(transitions = matrix.total(), counts = ?matrix.counts, "estimated transition matrix");
    Ok(matrix)
}

/// Probability vector to drive the simulator under `mode`.
///
/// In pairwise mode this is the matrix row of the final observed state.
pub fn estimate_with(
    mode: EstimatorMode,
    labeled: &[LabeledObservation],
) -> Result<TransitionProbabilities> {
    match mode {
        EstimatorMode::Ordinal => estimate(labeled),
        EstimatorMode::Pairwise => {
            let matrix = estimate_matrix(labeled)?;
            // require_transitions guarantees a last element
            let last = labeled[labeled.len() - 1].state;
            matrix.row(last).ok_or(PredictError::InsufficientData {
                needed: 1,
                got: 0,
                what: "transitions out of the final state",
            })
        }
    }
}
