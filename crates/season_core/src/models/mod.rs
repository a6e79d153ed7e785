//! Input data for a projection run: the current table and the remaining fixtures.

pub mod fixture;
pub mod team;

pub use fixture::{Fixture, FixtureOdds, OutcomeProbabilities, RatingTable};
pub use team::{CurrentStandings, Team};
