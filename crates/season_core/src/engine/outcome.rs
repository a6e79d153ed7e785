//! Match result categories and the fixed league points mapping.

use serde::{Deserialize, Serialize};

pub const POINTS_WIN: u32 = 3;
pub const POINTS_DRAW: u32 = 1;
pub const POINTS_LOSS: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchOutcome {
    /// Result implied by a final score.
    pub fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        use std::cmp::Ordering::*;
        match home_goals.cmp(&away_goals) {
            Greater => MatchOutcome::HomeWin,
            Less => MatchOutcome::AwayWin,
            Equal => MatchOutcome::Draw,
        }
    }

    /// `(home_points, away_points)`
    #[inline]
    pub const fn points(self) -> (u32, u32) {
        match self {
            MatchOutcome::HomeWin => (POINTS_WIN, POINTS_LOSS),
            MatchOutcome::Draw => (POINTS_DRAW, POINTS_DRAW),
            MatchOutcome::AwayWin => (POINTS_LOSS, POINTS_WIN),
        }
    }
}
