//! # Match Outcome Models
//!
//! Two interchangeable ways of turning a fixture into a [`MatchOutcome`]:
//!
//! - [`OutcomeModel::Probability`]: draws directly from the fixture's
//!   home/draw/away triple after renormalizing it.
//! - [`OutcomeModel::Ratings`]: derives expected goals from team-strength
//!   ratings and samples independent Poisson scorelines.
//!
//! Validation happens once in [`OutcomeModel::prepare`]. The resulting
//! [`FixtureSampler`] is infallible, so the trial loop never sees bad input.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::outcome::MatchOutcome;
use crate::config::PoissonConfig;
use crate::error::{Result, SimError};
use crate::models::{Fixture, FixtureOdds, OutcomeProbabilities, RatingTable};

/// Raw triples further than this from 1.0 are reported before renormalizing.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 0.01;

// ============================================================================
// Model
// ============================================================================

/// Ratings-derived goal model: parameters plus the ratings source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingsModel {
    #[serde(default)]
    pub config: PoissonConfig,
    #[serde(default)]
    pub ratings: RatingTable,
}

impl RatingsModel {
    pub fn new(config: PoissonConfig, ratings: RatingTable) -> Self {
        Self { config, ratings }
    }

    /// Ratings for both sides: the fixture's own pair first, then the table,
    /// then the configured default.
    fn resolve_ratings(&self, fixture: &Fixture) -> (f64, f64) {
        match fixture.odds {
            FixtureOdds::Ratings { home, away } => (home, away),
            FixtureOdds::Probabilities(_) | FixtureOdds::Unrated => {
                let lookup = |team: &str| self.ratings.get(team).unwrap_or(self.config.default_rating);
                (lookup(&fixture.home_team), lookup(&fixture.away_team))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum OutcomeModel {
    Probability,
    Ratings(RatingsModel),
}

impl OutcomeModel {
    pub fn ratings(config: PoissonConfig, ratings: RatingTable) -> Self {
        OutcomeModel::Ratings(RatingsModel::new(config, ratings))
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutcomeModel::Probability => "probability",
            OutcomeModel::Ratings(_) => "ratings",
        }
    }

    /// Model-level parameter check, independent of any fixture.
    pub fn validate(&self) -> Result<()> {
        match self {
            OutcomeModel::Probability => Ok(()),
            OutcomeModel::Ratings(model) => model.config.validate(),
        }
    }

    /// Validate one fixture and build its sampler.
    pub fn prepare(&self, fixture: &Fixture) -> Result<FixtureSampler> {
        match self {
            OutcomeModel::Probability => match fixture.odds {
                FixtureOdds::Probabilities(raw) => {
                    let normalized = normalize_probabilities(raw)
                        .map_err(|reason| SimError::model_input(fixture.label(), reason))?;
                    Ok(FixtureSampler::categorical(normalized))
                }
                FixtureOdds::Ratings { .. } | FixtureOdds::Unrated => Err(SimError::model_input(
                    fixture.label(),
                    "probability model requires prob_home_win/prob_draw/prob_away_win",
                )),
            },
            OutcomeModel::Ratings(model) => {
                let (home_rating, away_rating) = model.resolve_ratings(fixture);
                if !home_rating.is_finite() || !away_rating.is_finite() {
                    return Err(SimError::model_input(
                        fixture.label(),
                        format!("non-finite rating ({}, {})", home_rating, away_rating),
                    ));
                }
                let (home_rate, away_rate) = model.config.goal_rates(home_rating, away_rating);
                if !home_rate.is_finite() || !away_rate.is_finite() {
                    return Err(SimError::model_input(
                        fixture.label(),
                        format!("goal rates overflow ({}, {})", home_rate, away_rate),
                    ));
                }
                FixtureSampler::poisson(home_rate, away_rate)
                    .map_err(|reason| SimError::model_input(fixture.label(), reason))
            }
        }
    }

    /// Prepare a whole fixture list; the first invalid fixture fails it.
    pub fn prepare_all(&self, fixtures: &[Fixture]) -> Result<Vec<FixtureSampler>> {
        self.validate()?;

        if matches!(self, OutcomeModel::Probability) {
            let off_sum = fixtures
                .iter()
                .filter(|f| match f.odds {
                    FixtureOdds::Probabilities(p) => (p.sum() - 1.0).abs() > PROBABILITY_SUM_TOLERANCE,
                    _ => false,
                })
                .count();
            if off_sum > 0 {
                warn!(
                    "{} of {} fixtures have probabilities not summing to 1.0; renormalizing",
                    off_sum,
                    fixtures.len()
                );
            }
        }

        let samplers = fixtures.iter().map(|f| self.prepare(f)).collect::<Result<Vec<_>>>()?;
        debug!("Prepared {} fixture samplers ({} model)", samplers.len(), self.name());
        Ok(samplers)
    }

    /// Validate and sample in one step.
    pub fn sample<R: Rng + ?Sized>(&self, fixture: &Fixture, rng: &mut R) -> Result<MatchOutcome> {
        Ok(self.prepare(fixture)?.sample(rng))
    }
}

/// Scale a raw home/draw/away triple so it sums to 1.
///
/// Fails when any weight is negative or non-finite, or all are zero.
pub fn normalize_probabilities(raw: OutcomeProbabilities) -> std::result::Result<OutcomeProbabilities, String> {
    let weights = [raw.home_win, raw.draw, raw.away_win];
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(format!("non-finite probability in {:?}", weights));
    }
    if weights.iter().any(|w| *w < 0.0) {
        return Err(format!("negative probability in {:?}", weights));
    }
    let total = raw.sum();
    if total <= 0.0 {
        return Err("all outcome probabilities are zero".to_string());
    }
    Ok(OutcomeProbabilities::new(raw.home_win / total, raw.draw / total, raw.away_win / total))
}

// ============================================================================
// Sampler
// ============================================================================

/// A validated, ready-to-sample fixture.
#[derive(Debug, Clone)]
pub enum FixtureSampler {
    /// Cumulative cut-offs over a uniform draw in `[0, 1)`.
    Categorical { home_cut: f64, draw_cut: f64 },
    /// Independent Poisson goal counts.
    Poisson { home: Poisson<f64>, away: Poisson<f64> },
}

impl FixtureSampler {
    fn categorical(p: OutcomeProbabilities) -> Self {
        // An impossible away win must stay impossible despite rounding in the sum.
        let draw_cut = if p.away_win == 0.0 { 1.0 } else { p.home_win + p.draw };
        FixtureSampler::Categorical { home_cut: p.home_win, draw_cut }
    }

    fn poisson(home_rate: f64, away_rate: f64) -> std::result::Result<Self, String> {
        let home = Poisson::new(home_rate).map_err(|e| format!("home goal rate {}: {}", home_rate, e))?;
        let away = Poisson::new(away_rate).map_err(|e| format!("away goal rate {}: {}", away_rate, e))?;
        Ok(FixtureSampler::Poisson { home, away })
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MatchOutcome {
        match self {
            FixtureSampler::Categorical { home_cut, draw_cut } => {
                let roll: f64 = rng.gen();
                if roll < *home_cut {
                    MatchOutcome::HomeWin
                } else if roll < *draw_cut {
                    MatchOutcome::Draw
                } else {
                    MatchOutcome::AwayWin
                }
            }
            FixtureSampler::Poisson { home, away } => {
                let home_goals: f64 = home.sample(rng);
                let away_goals: f64 = away.sample(rng);
                MatchOutcome::from_goals(home_goals as u32, away_goals as u32)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
