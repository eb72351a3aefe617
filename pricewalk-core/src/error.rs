//! Error taxonomy shared by the model components and the pipeline.

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::DataError;

/// Errors from classification, estimation, simulation and the pipeline.
///
/// Components fail fast: nothing here is retried or replaced with a default.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient data: need at least {needed} {what}, got {got}")]
    InsufficientData {
        needed: usize,
        got: usize,
        what: &'static str,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl PredictError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PredictError::InvalidInput(msg.into())
    }
}

pub type Result<T, E = PredictError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_the_shortfall() {
        let err = PredictError::InsufficientData {
            needed: 2,
            got: 1,
            what: "labeled observations",
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 2 labeled observations, got 1"
        );
    }
}
