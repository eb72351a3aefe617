//! Writing predictions out for downstream renderers, and reading them back.
//!
//! The JSON form is the whole `Prediction`. The CSV form is one
//! `date,value,kind` row per point, observed history before the forecast.

use anyhow::{ensure, Context, Result};
use serde::Serialize;

use crate::domain::Observation;
use crate::predictor::{Prediction, SCHEMA_VERSION};

/// Pretty-printed JSON of the whole prediction.
pub fn prediction_to_json(prediction: &Prediction) -> Result<String> {
    serde_json::to_string_pretty(prediction)
        .with_context(|| format!("serializing prediction for {}", prediction.symbol))
}

/// Parse a prediction written by [`prediction_to_json`].
///
/// Rejects files from a newer schema and files whose forecast does not agree
/// with their own recorded configuration.
pub fn prediction_from_json(json: &str) -> Result<Prediction> {
    let prediction: Prediction = serde_json::from_str(json).context("parsing prediction JSON")?;
    ensure!(
        prediction.schema_version <= SCHEMA_VERSION,
        "prediction uses schema {}, this build reads up to {}",
        prediction.schema_version,
        SCHEMA_VERSION
    );
    ensure!(
        prediction.predicted.len() == prediction.config.horizon,
        "prediction has {} forecast points but horizon {}",
        prediction.predicted.len(),
        prediction.config.horizon
    );
    ensure!(
        prediction.paths.iter().all(|p| p.len() == prediction.config.horizon),
        "prediction has a path whose length differs from horizon {}",
        prediction.config.horizon
    );
    Ok(prediction)
}

#[derive(Serialize)]
struct Row<'a> {
    date: String,
    value: String,
    kind: &'a str,
}

impl<'a> Row<'a> {
    fn new(o: &Observation, kind: &'a str) -> Self {
        Self {
            date: o.date.to_string(),
            value: format!("{:.4}", o.value),
            kind,
        }
    }
}

/// `date,value,kind` rows with kind `observed` or `predicted`.
pub fn prediction_to_csv(prediction: &Prediction) -> Result<String> {
    let mut out = csv::Writer::from_writer(Vec::new());
    let history = prediction.observed.iter().map(|o| Row::new(o, "observed"));
    let forecast = prediction.predicted.iter().map(|o| Row::new(o, "predicted"));
    for row in history.chain(forecast) {
        out.serialize(row)?;
    }
    let bytes = out.into_inner().context("flushing CSV rows")?;
    Ok(String::from_utf8(bytes)?)
}
