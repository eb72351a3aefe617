//! Date-range selection and dataset hashing over chronological series.

use chrono::{Duration, NaiveDate};

use crate::domain::Observation;

/// Inclusive date range covering `days` calendar days ending at `cutoff`.
///
/// The start saturates at `NaiveDate::MIN` for spans reaching past the
/// calendar's lower bound.
pub fn lookback_range(cutoff: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let span = Duration::days(i64::from(days.saturating_sub(1)));
    let start = cutoff.checked_sub_signed(span).unwrap_or(NaiveDate::MIN);
    (start, cutoff)
}

/// Observations with `start <= date <= end`. `series` must be chronological.
pub fn select_range(series: &[Observation], start: NaiveDate, end: NaiveDate) -> &[Observation] {
    let lo = series.partition_point(|o| o.date < start);
    let hi = series.partition_point(|o| o.date <= end);
    if lo >= hi {
        return &[];
    }
    &series[lo..hi]
}

/// The last `days` calendar days of `series` up to and including `cutoff`.
pub fn lookback_window(series: &[Observation], cutoff: NaiveDate, days: u32) -> &[Observation] {
    let (start, end) = lookback_range(cutoff, days);
    select_range(series, start, end)
}

/// Deterministic BLAKE3 hash over dates and values.
pub fn dataset_hash(series: &[Observation]) -> String {
    let mut hasher = blake3::Hasher::new();
    for observation in series {
        hasher.update(observation.date.to_string().as_bytes());
        hasher.update(&observation.value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
