//! # Reconstruction Configuration
//!
//! Tunables for the heuristic fallbacks of the pipeline. Every field has a
//! default, so an empty JSON object is a valid config.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ReconstructConfig::load("configs/fencing.json")?;
//! let stats = reconstruct(&snapshot, &config);
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::Side;

pub const RECONSTRUCT_CONFIG_PATH_ENV: &str = "BOUT_RECONSTRUCT_CONFIG_PATH";

/// Largest accepted nearest-boundary tolerance.
pub const MAX_PERIOD_TOLERANCE_SECS: u32 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ReconstructConfig {
    /// Maximum distance (seconds) between an event and the nearest period
    /// boundary for the nearest-period fallback (default: 5)
    #[serde(default = "default_period_tolerance_secs")]
    pub period_tolerance_secs: u32,

    /// Period assigned when no boundary is within tolerance (default: 1)
    #[serde(default = "default_fallback_period")]
    pub fallback_period: u32,

    /// Run progression, tally and best run on the rayon pool (default: true)
    #[serde(default = "default_true")]
    pub parallel_stats: bool,

    /// Side credited with touches whose scorer cannot be identified (default: B)
    #[serde(default = "default_conventional_side")]
    pub conventional_side: Side,
}

fn default_period_tolerance_secs() -> u32 {
    5
}

fn default_fallback_period() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_conventional_side() -> Side {
    Side::B
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            period_tolerance_secs: default_period_tolerance_secs(),
            fallback_period: default_fallback_period(),
            parallel_stats: default_true(),
            conventional_side: default_conventional_side(),
        }
    }
}

impl ReconstructConfig {
    /// Load config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse config from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ReconstructConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config named by `BOUT_RECONSTRUCT_CONFIG_PATH`, or defaults when unset/empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(RECONSTRUCT_CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::load(path).map_err(|e| match e {
            ConfigError::Io(msg) => ConfigError::Io(format!(
                "Failed to read config from {RECONSTRUCT_CONFIG_PATH_ENV}='{path}': {msg}"
            )),
            other => other,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_tolerance_secs > MAX_PERIOD_TOLERANCE_SECS {
            return Err(ConfigError::Validation(format!(
                "period_tolerance_secs must be 0-{}, got {}",
                MAX_PERIOD_TOLERANCE_SECS, self.period_tolerance_secs
            )));
        }
        if self.fallback_period == 0 {
            return Err(ConfigError::Validation(
                "fallback_period must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn with_parallel_stats(mut self, parallel: bool) -> Self {
        self.parallel_stats = parallel;
        self
    }
}
