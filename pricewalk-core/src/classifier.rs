//! State classifier: price series → movement labels.
//!
//! Each observation is compared with its predecessor. The first observation
//! has no predecessor and is always labeled [`State::Same`].

use crate::domain::{LabeledObservation, Observation, State};
use crate::error::{PredictError, Result};

/// Label every observation of a chronological series.
///
/// Output has the same length as the input. Fails with `InvalidInput` on an
/// empty series.
pub fn classify(series: &[Observation]) -> Result<Vec<LabeledObservation>> {
    let states = classify_values(series.iter().map(|o| o.value))?;
    Ok(series
        .iter()
        .zip(states)
        .map(|(&observation, state)| LabeledObservation { observation, state })
        .collect())
}

/// Same rule as [`classify`], over bare values.
pub fn classify_values<I>(values: I) -> Result<Vec<State>>
where
    I: IntoIterator<Item = f64>,
{
    let mut values = values.into_iter();
    let first = values
        .next()
        .ok_or_else(|| PredictError::invalid("cannot classify an empty series"))?;

    let mut states = vec![State::Same];
    let mut previous = first;
    for current in values {
        states.push(State::between(previous, current));
        previous = current;
    }
    Ok(states)
}
