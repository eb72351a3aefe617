//! Observation — the fundamental price series unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::State;

/// A single dated price value.
///
/// Series are chronological with no duplicate dates; the loaders in
/// [`crate::data`] enforce this, the model functions assume it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An observation tagged with its movement relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledObservation {
    #[serde(flatten)]
    pub observation: Observation,
    pub state: State,
}

impl LabeledObservation {
    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }

    pub fn value(&self) -> f64 {
        self.observation.value
    }
}
