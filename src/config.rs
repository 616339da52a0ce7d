//! Tunable constants of the decision policy.
//!
//! Every field defaults to the value the agent plays with; a JSON file only
//! needs to name the fields it overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading or validating an [`AgentConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read agent config from {path:?}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The JSON did not match the config schema.
    #[error("failed to parse agent config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the policy cannot work with.
    #[error("invalid agent config: {0}")]
    Invalid(String),
}

/// Decision policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Step budget of the inward threat search around our General.
    pub threat_budget: usize,
    /// Step budget of the Defend gather toward a detected threat.
    pub defend_budget: usize,
    /// Step budget of the gather fired when our General is touched.
    pub emergency_budget: usize,
    /// Priority of that emergency gather.
    pub emergency_priority: i64,
    /// Priority of gathers toward sighted enemy Generals.
    pub general_priority: i64,
    /// Priority of a gather toward the General of the player we are chasing.
    pub counter_general_priority: i64,
    /// Priority attached to chase steps.
    pub chase_priority: i64,
    /// Every this many turns the agent quick-expands instead of expanding land.
    pub expansion_period: u32,
    /// Priority of quick-expand moves.
    pub quick_expand_priority: i64,
    /// Priority of land-expansion gathers.
    pub expand_priority: i64,
    /// Step budget of each narrow land-expansion gather.
    pub expand_narrow_budget: usize,
    /// Step budget of the forced gather when no narrow one succeeds.
    pub expand_fallback_budget: usize,
    /// Probability that a later candidate replaces the held one when sampling
    /// exploration and threat destinations.
    pub sample_retention: f64,
    /// Gather toward the cheapest foreign City when exploration queues nothing.
    pub capture_cities: bool,
    /// Priority of City capture gathers.
    pub city_priority: i64,
    /// Step budget of City capture gathers.
    pub city_budget: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            threat_budget: 10,
            defend_budget: 25,
            emergency_budget: 10,
            emergency_priority: 999,
            general_priority: 100,
            counter_general_priority: 5,
            chase_priority: 999,
            expansion_period: 17,
            quick_expand_priority: 50,
            expand_priority: 10,
            expand_narrow_budget: 1,
            expand_fallback_budget: 10,
            sample_retention: 0.7,
            capture_cities: false,
            city_priority: 1,
            city_budget: 34,
        }
    }
}

impl AgentConfig {
    /// Parse and validate a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "agent config loaded");
        Ok(config)
    }

    /// Check the values the policy depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.sample_retention) {
            return Err(ConfigError::Invalid(format!(
                "sample_retention must be within [0, 1], got {}",
                self.sample_retention
            )));
        }
        if self.expansion_period == 0 {
            return Err(ConfigError::Invalid("expansion_period must be positive".to_string()));
        }
        Ok(())
    }
}
