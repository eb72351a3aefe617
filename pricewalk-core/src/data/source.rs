//! Series source trait and structured error types.
//!
//! `SeriesSource` abstracts over where a price series comes from (CSV export,
//! in-memory fixture, an embedding application) so the pipeline never does
//! its own fetching or caching.

use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

use super::select::select_range;
use crate::domain::Observation;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column: expected one of {expected:?}")]
    MissingColumn { expected: Vec<String> },

    #[error("line {line}: bad date '{value}'")]
    BadDate { line: u64, value: String },

    #[error("line {line}: bad value '{value}'")]
    BadValue { line: u64, value: String },

    #[error("duplicate date {0}")]
    DuplicateDate(NaiveDate),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no observations for '{symbol}' between {start} and {end}")]
    Empty {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// A provider of chronological price series.
pub trait SeriesSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Observations for `symbol` with `start <= date <= end`, chronological.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, DataError>;
}

/// Series held in memory, keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, Vec<Observation>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series; it is sorted by date and must not repeat a date.
    pub fn insert(
        &mut self,
        symbol: impl Into<String>,
        mut series: Vec<Observation>,
    ) -> Result<(), DataError> {
        series.sort_by_key(|o| o.date);
        if let Some(pair) = series.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DataError::DuplicateDate(pair[0].date));
        }
        self.series.insert(symbol.into(), series);
        Ok(())
    }
}

impl SeriesSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, DataError> {
        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        Ok(select_range(series, start, end).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn in_memory_sorts_and_filters() {
        let mut source = InMemorySource::new();
        source
            .insert(
                "ASX200",
                vec![
                    Observation::new(d(3), 3.0),
                    Observation::new(d(1), 1.0),
                    Observation::new(d(2), 2.0),
                ],
            )
            .unwrap();

        let fetched = source.fetch("ASX200", d(2), d(3)).unwrap();
        let values: Vec<f64> = fetched.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![2.0, 3.0]);
    }

    #[test]
    fn in_memory_rejects_duplicate_dates() {
        let mut source = InMemorySource::new();
        let err = source
            .insert(
                "ASX200",
                vec![Observation::new(d(1), 1.0), Observation::new(d(1), 2.0)],
            )
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateDate(_)));
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let source = InMemorySource::new();
        let err = source.fetch("NOPE", d(1), d(2)).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }
}
