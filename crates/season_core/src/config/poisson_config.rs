//! Poisson Goal Model Configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Ratings-derived goal model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonConfig {
    // === Base Goal Rates ===
    /// Home expected goals at equal ratings (default: 1.3)
    pub base_home: f64,
    /// Away expected goals at equal ratings (default: 1.1)
    pub base_away: f64,

    // === Rating Influence ===
    /// Rating difference worth one expected goal (default: 50.0)
    pub rating_scale: f64,
    /// Lower bound for either expected goal rate (default: 0.1)
    pub min_rate: f64,

    /// Rating used for teams missing from the ratings source (default: 50.0)
    pub default_rating: f64,
}

impl Default for PoissonConfig {
    fn default() -> Self {
        Self {
            base_home: 1.3,
            base_away: 1.1,

            rating_scale: 50.0,
            min_rate: 0.1,

            default_rating: 50.0,
        }
    }
}

impl PoissonConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("base_home", self.base_home),
            ("base_away", self.base_away),
            ("rating_scale", self.rating_scale),
            ("min_rate", self.min_rate),
            ("default_rating", self.default_rating),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.rating_scale <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "rating_scale must be positive, got {}",
                self.rating_scale
            )));
        }
        if self.min_rate <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "min_rate must be positive, got {}",
                self.min_rate
            )));
        }
        Ok(())
    }

    /// Expected goal rates `(home, away)` for a pair of ratings.
    pub fn goal_rates(&self, home_rating: f64, away_rating: f64) -> (f64, f64) {
        let diff = (home_rating - away_rating) / self.rating_scale;
        let home = (self.base_home + diff).max(self.min_rate);
        let away = (self.base_away - diff).max(self.min_rate);
        (home, away)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_rates_equal_ratings() {
        let cfg = PoissonConfig::default();
        let (home, away) = cfg.goal_rates(60.0, 60.0);
        assert!((home - 1.3).abs() < 1e-12);
        assert!((away - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_goal_rates_floor() {
        let cfg = PoissonConfig::default();
        // 100 points of rating gap = 2 goals
        let (home, away) = cfg.goal_rates(0.0, 100.0);
        assert!((home - 0.1).abs() < 1e-12);
        assert!((away - 3.1).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let cfg = PoissonConfig { rating_scale: 0.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        let cfg = PoissonConfig { base_home: f64::NAN, ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}
