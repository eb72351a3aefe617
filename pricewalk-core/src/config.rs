//! Predictor configuration.
//!
//! All model constants (lookback, window length, step size, horizon) are
//! explicit fields here and are passed into each component. Loaded from TOML;
//! missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::estimator::EstimatorMode;
use crate::simulator::SimulatorConfig;

/// Longest accepted lookback, about a century of calendar days.
pub const MAX_LOOKBACK_DAYS: u32 = 36_600;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything one prediction run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictorConfig {
    /// Calendar days before the cutoff date fed to the model.
    pub lookback_days: u32,

    /// Seed window length K.
    pub window_len: usize,

    /// Price units moved per INCREASE/DECREASE step.
    pub step_size: f64,

    /// Number of future steps to simulate.
    pub horizon: usize,

    /// Transition estimation rule.
    pub estimator: EstimatorMode,

    /// Master seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Number of simulated trajectories.
    pub paths: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        let simulator = SimulatorConfig::default();
        Self {
            lookback_days: 120,
            window_len: simulator.window_len,
            step_size: simulator.step_size,
            horizon: 10,
            estimator: EstimatorMode::default(),
            seed: None,
            paths: 1,
        }
    }
}

impl PredictorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: PredictorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(invalid(
                "lookback_days",
                format!(
                    "must be between 1 and {MAX_LOOKBACK_DAYS}, got {}",
                    self.lookback_days
                ),
            ));
        }
        if self.window_len == 0 {
            return Err(invalid("window_len", "must be at least 1"));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(invalid(
                "step_size",
                format!("must be finite and positive, got {}", self.step_size),
            ));
        }
        if self.horizon == 0 {
            return Err(invalid("horizon", "must be at least 1"));
        }
        if self.paths == 0 {
            return Err(invalid("paths", "must be at least 1"));
        }
        Ok(())
    }

    pub fn simulator(&self) -> SimulatorConfig {
        SimulatorConfig {
            window_len: self.window_len,
            step_size: self.step_size,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
