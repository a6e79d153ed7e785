//! Run-level entry points: validate → prepare → simulate → report.

pub mod json_api;

pub use json_api::{project_season_json, ProjectionRequest, ProjectionResponse};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::engine::{OutcomeModel, SeasonSimulator};
use crate::error::{Result, SimError};
use crate::models::{CurrentStandings, Fixture};
use crate::report::{ProbabilityFormat, ProjectionRecord, ProjectionReporter, SeasonProjectionRow};

/// Result of one complete projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonProjection {
    pub season: String,
    /// Seed actually used, explicit or generated
    pub seed: u64,
    pub trial_count: u32,
    pub model: String,
    pub records: Vec<ProjectionRecord>,
}

impl SeasonProjection {
    pub fn rows(&self, format: ProbabilityFormat) -> Vec<SeasonProjectionRow> {
        self.records.iter().map(|r| r.to_row(format)).collect()
    }

    pub fn record(&self, team: &str) -> Option<&ProjectionRecord> {
        self.records.iter().find(|r| r.team == team)
    }
}

/// The configured seed, or a fresh one that is logged for reproduction.
pub fn resolve_seed(config: &SimulationConfig) -> u64 {
    match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            warn!("No seed configured; generated seed {} (pass it back to reproduce this run)", seed);
            seed
        }
    }
}

/// Project final standings for one season.
///
/// Either every trial runs and the full projection is returned, or an error
/// is returned and nothing else happens.
pub fn project_season(
    config: &SimulationConfig,
    standings: &CurrentStandings,
    fixtures: &[Fixture],
    model: &OutcomeModel,
) -> Result<SeasonProjection> {
    config.validate()?;
    if standings.is_empty() {
        return Err(SimError::EmptyStandings);
    }
    if fixtures.is_empty() && config.require_fixtures {
        return Err(SimError::EmptyFixtureList);
    }

    let seed = resolve_seed(config);
    info!(
        "Projecting season {}: {} teams, {} fixtures, {} trials, {} model, seed {}",
        config.season,
        standings.len(),
        fixtures.len(),
        config.trial_count,
        model.name(),
        seed
    );

    let simulator = SeasonSimulator::new(standings, fixtures, model, seed)?;
    let aggregator = simulator.simulate(config.trial_count, config.parallel)?;
    let records = ProjectionReporter::from_config(config).report(standings, &aggregator);

    if let Some(leader) = records.first() {
        info!(
            "Projection complete: {} leads with {:.1} expected points ({:.1}% title)",
            leader.team,
            leader.expected_points,
            leader.prob_title * 100.0
        );
    }

    Ok(SeasonProjection {
        season: config.season.clone(),
        seed,
        trial_count: config.trial_count,
        model: model.name().to_string(),
        records,
    })
}
