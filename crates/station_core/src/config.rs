//! Runtime configuration: timer pacing, the random seed and the price band.
//!
//! Game constants such as costs and rates are compiled in. Only pacing and
//! randomness are tunable, from a RON file like:
//!
//! ```ron
//! (
//!     seed: 42,
//!     intervals: (check_missions_ms: 2000),
//!     price_band: (max_delta: 0.25, floor: 0.1, ceiling: Some(20.0)),
//! )
//! ```
//!
//! Omitted fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::market::PriceBand;

/// How often each timer task fires, in milliseconds. Zero disables a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskIntervals {
    /// Energy regeneration.
    pub regenerate_energy_ms: u64,
    /// Building production.
    pub produce_resources_ms: u64,
    /// Role recomputation.
    pub update_role_ms: u64,
    /// Mission sweep.
    pub check_missions_ms: u64,
    /// Market price drift.
    pub drift_prices_ms: u64,
}

impl Default for TaskIntervals {
    fn default() -> Self {
        Self {
            regenerate_energy_ms: 1_000,
            produce_resources_ms: 1_000,
            update_role_ms: 1_000,
            check_missions_ms: 5_000,
            drift_prices_ms: 60_000,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Timer pacing.
    pub intervals: TaskIntervals,
    /// Seed for first contact and price drift.
    pub seed: u64,
    /// Bounds on price drift.
    pub price_band: PriceBand,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            intervals: TaskIntervals::default(),
            seed: 0,
            price_band: PriceBand::default(),
        }
    }
}

impl StationConfig {
    /// Default pacing with a specific seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Load a configuration from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let path_str = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|e| GameError::Config {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&contents, &path_str)?;
        tracing::info!(path = %path_str, seed = config.seed, "Loaded station config");
        Ok(config)
    }

    /// Parse a configuration from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the text does not parse.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Self::parse(ron, "<inline>")
    }

    fn parse(contents: &str, origin: &str) -> Result<Self> {
        ron::from_str(contents).map_err(|e| GameError::Config {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }
}
