//! # season_core - Deterministic Season Projection Engine
//!
//! Monte Carlo projection of final league standings from the current table
//! and a match outcome model.
//!
//! ## Features
//! - Two outcome models: direct probability draw and ratings-driven Poisson goals
//! - 100% deterministic (same seed = same projection), sequential or parallel
//! - Streaming aggregation: memory independent of the trial count
//! - Title, top-k and relegation probabilities per team
//!
//! ## Tie-break
//! Teams level on points are ranked by their order in the current standings.
//! Goal difference and head-to-head are not modelled.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;

pub use api::{project_season, project_season_json, resolve_seed, SeasonProjection};
pub use config::{PoissonConfig, SimulationConfig};
pub use engine::{
    FinalStandingsSnapshot, MatchOutcome, OutcomeModel, PositionDistribution, SeasonSimulator,
    StandingsAggregator,
};
pub use error::{Result, SimError};
pub use models::{CurrentStandings, Fixture, FixtureOdds, OutcomeProbabilities, RatingTable, Team};
pub use report::{ProbabilityFormat, ProjectionRecord, ProjectionReporter, SeasonProjectionRow};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
