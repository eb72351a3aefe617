//! Upstream price series: sources, CSV loading, lookback selection.

pub mod csv_file;
pub mod select;
pub mod source;

pub use csv_file::{parse_csv, CsvSource};
pub use select::{dataset_hash, lookback_range, lookback_window, select_range};
pub use source::{DataError, InMemorySource, SeriesSource};
