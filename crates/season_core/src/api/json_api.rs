use serde::{Deserialize, Serialize};

use super::project_season;
use crate::config::SimulationConfig;
use crate::engine::OutcomeModel;
use crate::error::{Result, SimError};
use crate::models::{CurrentStandings, Fixture, Team};
use crate::report::{ProbabilityFormat, SeasonProjectionRow};
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub config: SimulationConfig,
    pub standings: Vec<Team>,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    pub model: OutcomeModel,
    #[serde(default)]
    pub format: ProbabilityFormat,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectionResponse {
    pub schema_version: u8,
    pub season: String,
    pub seed: u64,
    pub trial_count: u32,
    pub model: String,
    pub rows: Vec<SeasonProjectionRow>,
}

/// JSON in, JSON out wrapper around [`project_season`].
pub fn project_season_json(request_json: &str) -> Result<String> {
    let request: ProjectionRequest = serde_json::from_str(request_json)?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::InvalidConfig(format!(
            "unsupported schema version: {}",
            request.schema_version
        )));
    }

    let standings = CurrentStandings::new(request.standings)?;
    let projection = project_season(&request.config, &standings, &request.fixtures, &request.model)?;

    let response = ProjectionResponse {
        schema_version: SCHEMA_VERSION,
        rows: projection.rows(request.format),
        season: projection.season,
        seed: projection.seed,
        trial_count: projection.trial_count,
        model: projection.model,
    };
    Ok(serde_json::to_string(&response)?)
}
