//! # Season Projection Engine
//!
//! - [`outcome_model`]: validated per-fixture samplers (probability draw or
//!   Poisson goals)
//! - [`season`]: trial loop and per-trial random streams
//! - [`standings`]: ranking and streaming aggregation
//! - [`sort_keys`]: deterministic tie-break ordering

pub mod outcome;
pub mod outcome_model;
pub mod season;
pub mod sort_keys;
pub mod standings;


pub use outcome::MatchOutcome;
pub use outcome_model::{normalize_probabilities, FixtureSampler, OutcomeModel, RatingsModel};
pub use season::{run, trial_rng, PreparedFixture, SeasonSimulator};
pub use standings::{FinalStandingsSnapshot, PositionDistribution, StandingsAggregator, StandingsEntry};
