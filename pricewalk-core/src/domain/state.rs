//! Movement state of a value relative to its predecessor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three movement states.
///
/// Index ordering is fixed: `[Increase, Same, Decrease]`. Probability
/// vectors, bucket counts and sampling weights all use this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    Increase,
    Same,
    Decrease,
}

impl State {
    /// All states in index order.
    pub const ALL: [State; 3] = [State::Increase, State::Same, State::Decrease];

    pub fn index(self) -> usize {
        match self {
            State::Increase => 0,
            State::Same => 1,
            State::Decrease => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<State> {
        Self::ALL.get(index).copied()
    }

    /// Textual label, as shown to users and compared by the ordinal estimator.
    pub fn as_str(self) -> &'static str {
        match self {
            State::Increase => "INCREASE",
            State::Same => "SAME",
            State::Decrease => "DECREASE",
        }
    }

    /// Classify `current` against `previous`.
    pub fn between(previous: f64, current: f64) -> State {
        if current > previous {
            State::Increase
        } else if current < previous {
            State::Decrease
        } else {
            State::Same
        }
    }

    /// Signed value change produced by this state for a given step size.
    pub fn delta(self, step_size: f64) -> f64 {
        match self {
            State::Increase => step_size,
            State::Same => 0.0,
            State::Decrease => -step_size,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
