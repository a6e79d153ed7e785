//! # Simulation Configuration
//!
//! Every tunable value of a projection run lives here and is passed in
//! explicitly. Nothing is read from global state.
//!
//! ## Usage
//! ```rust
//! use season_core::config::SimulationConfig;
//!
//! let config = SimulationConfig::default();
//! let quick = SimulationConfig { trial_count: 1_000, seed: Some(7), ..config };
//! assert!(quick.validate().is_ok());
//! ```

mod poisson_config;

pub use poisson_config::PoissonConfig;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

pub const DEFAULT_TRIAL_COUNT: u32 = 10_000;
pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_RELEGATION_BAND: usize = 3;
pub const DEFAULT_SEASON: &str = "2025";

/// Run-level settings for one season projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Season identifier carried through to the output
    pub season: String,
    /// Number of independent trials (default: 10,000)
    pub trial_count: u32,
    /// Qualification band size (default: 4)
    pub top_k: usize,
    /// Relegation band size (default: 3)
    pub relegation_band: usize,
    /// Explicit seed; a random one is drawn and logged when absent
    pub seed: Option<u64>,
    /// Spread trials over the rayon thread pool
    pub parallel: bool,
    /// Treat an empty fixture list as "nothing to simulate"
    pub require_fixtures: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            trial_count: DEFAULT_TRIAL_COUNT,
            top_k: DEFAULT_TOP_K,
            relegation_band: DEFAULT_RELEGATION_BAND,
            seed: None,
            parallel: true,
            require_fixtures: true,
        }
    }
}

impl SimulationConfig {
    /// Probability-draw runs: 10,000 trials, bottom three relegated
    pub fn probability_preset() -> Self {
        Self::default()
    }

    /// Ratings-derived runs: 5,000 trials, bottom four relegated
    pub fn ratings_preset() -> Self {
        Self { trial_count: 5_000, relegation_band: 4, ..Self::default() }
    }

    /// Fixed seed, sequential, small trial count
    pub fn test() -> Self {
        Self { trial_count: 500, seed: Some(42), parallel: false, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.trial_count == 0 {
            return Err(SimError::InvalidConfig("trial_count must be >= 1".to_string()));
        }
        if self.season.trim().is_empty() {
            return Err(SimError::InvalidConfig("season must not be empty".to_string()));
        }
        Ok(())
    }
}
