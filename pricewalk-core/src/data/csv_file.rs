//! CSV price series loading.
//!
//! Accepts the common daily export layout (`Date,Open,High,Low,Close,Adj
//! Close,Volume`) as well as a bare `date,value` file. Header matching is
//! case-insensitive. Rows whose value is empty or `null` (non-trading days in
//! some exports) are skipped. Output is sorted by date; repeated dates are an
//! error.

use chrono::NaiveDate;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::select::select_range;
use super::source::{DataError, SeriesSource};
use crate::domain::Observation;

/// Value columns tried, in order, when none is configured.
const DEFAULT_VALUE_COLUMNS: [&str; 3] = ["close", "adj close", "value"];

const DATE_COLUMN: &str = "date";

/// Reads one CSV file as the series for whichever symbol is requested.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    value_column: Option<String>,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            value_column: None,
        }
    }

    /// Read values from `column` instead of the default candidates.
    pub fn with_value_column(mut self, column: impl Into<String>) -> Self {
        self.value_column = Some(column.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole file.
    pub fn load(&self) -> Result<Vec<Observation>, DataError> {
        let file = std::fs::File::open(&self.path).map_err(|source| DataError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        parse_csv(file, self.value_column.as_deref())
    }
}

impl SeriesSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, DataError> {
        let series = self.load()?;
        tracing::debug!(
            symbol,
            path = %self.path.display(),
            rows = series.len(),
            "loaded CSV series"
        );
        Ok(select_range(&series, start, end).to_vec())
    }
}

/// Parse a CSV document into a chronological series.
///
/// `value_column` names the value column; `None` tries `Close`, `Adj Close`
/// and `value` in that order.
pub fn parse_csv<R: Read>(
    reader: R,
    value_column: Option<&str>,
) -> Result<Vec<Observation>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let date_idx = find(DATE_COLUMN).ok_or_else(|| DataError::MissingColumn {
        expected: vec![DATE_COLUMN.to_string()],
    })?;
    let candidates: Vec<&str> = match value_column {
        Some(name) => vec![name],
        None => DEFAULT_VALUE_COLUMNS.to_vec(),
    };
    let value_idx = candidates
        .iter()
        .find_map(|&name| find(name))
        .ok_or_else(|| DataError::MissingColumn {
            expected: candidates.iter().map(|c| c.to_string()).collect(),
        })?;

    let mut series = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw_date = record.get(date_idx).unwrap_or_default();
        let raw_value = record.get(value_idx).unwrap_or_default();

        if raw_value.is_empty() || raw_value.eq_ignore_ascii_case("null") {
            skipped += 1;
            continue;
        }

        let date = parse_date(raw_date).ok_or_else(|| DataError::BadDate {
            line,
            value: raw_date.to_string(),
        })?;
        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DataError::BadValue {
                line,
                value: raw_value.to_string(),
            })?;
        series.push(Observation::new(date, value));
    }

    if skipped > 0 {
        tracing::warn!(skipped, "skipped CSV rows without a value");
    }

    series.sort_by_key(|o| o.date);
    if let Some(pair) = series.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(DataError::DuplicateDate(pair[0].date));
    }
    Ok(series)
}

/// `YYYY-MM-DD`, optionally followed by a time part (`2024-01-02 00:00:00+10:00`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
