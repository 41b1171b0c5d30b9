use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read agent config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid agent config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be at least {min}, got {value}")]
    TooFewBins {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositiveRange { field: &'static str, value: f64 },
    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitInterval { field: &'static str, value: f64 },
}

/// Hyper-parameters of [`crate::QAgent`].
///
/// Every field is optional in JSON; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// AoI value mapped onto the last AoI bin.
    pub max_aoi: f64,
    /// CQI value mapped onto the last CQI bin.
    pub max_cqi: f64,
    pub aoi_bins: usize,
    pub cqi_bins: usize,
    /// Number of evenly spaced weights in `[0, 1]`.
    pub num_weight_bins: usize,
    pub epsilon: f64,
    pub alpha: f64,
    pub gamma: f64,
    pub inference_mode: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_aoi: 10_000.0,
            max_cqi: 15.0,
            aoi_bins: 10,
            cqi_bins: 5,
            num_weight_bins: 11,
            epsilon: 0.1,
            alpha: 0.5,
            gamma: 0.99,
            inference_mode: false,
        }
    }
}

impl AgentConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// any error from [`AgentConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Same as [`AgentConfig::from_json`], plus [`ConfigError::Read`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks the invariants the agent relies on for in-bounds indexing.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value, min) in [
            ("aoi_bins", self.aoi_bins, 1),
            ("cqi_bins", self.cqi_bins, 1),
            ("num_weight_bins", self.num_weight_bins, 2),
        ] {
            if value < min {
                return Err(ConfigError::TooFewBins { field, min, value });
            }
        }
        for (field, value) in [("max_aoi", self.max_aoi), ("max_cqi", self.max_cqi)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveRange { field, value });
            }
        }
        for (field, value) in [
            ("epsilon", self.epsilon),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitInterval { field, value });
            }
        }
        Ok(())
    }

    /// `[aoi_bins, cqi_bins, num_weight_bins]`
    #[must_use]
    pub fn table_shape(&self) -> [usize; 3] {
        [self.aoi_bins, self.cqi_bins, self.num_weight_bins]
    }
}
