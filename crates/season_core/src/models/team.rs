use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// One row of the current league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub points: u32,
}

impl Team {
    pub fn new(id: impl Into<String>, points: u32) -> Self {
        Self { id: id.into(), points }
    }
}

/// Current standings with a dense team → index table.
///
/// The index of a team is its row position in the input. It doubles as the
/// tie-break key when two teams finish level on points.
#[derive(Debug, Clone)]
pub struct CurrentStandings {
    teams: Vec<Team>,
    index: FxHashMap<String, usize>,
}

impl CurrentStandings {
    pub fn new(teams: Vec<Team>) -> Result<Self> {
        if teams.is_empty() {
            return Err(SimError::EmptyStandings);
        }

        let mut index = FxHashMap::default();
        index.reserve(teams.len());
        for (idx, team) in teams.iter().enumerate() {
            if team.id.trim().is_empty() {
                return Err(SimError::InvalidStandings(format!("empty team id at row {}", idx + 1)));
            }
            if index.insert(team.id.clone(), idx).is_some() {
                return Err(SimError::InvalidStandings(format!("duplicate team '{}'", team.id)));
            }
        }

        Ok(Self { teams, index })
    }

    pub fn index_of(&self, team_id: &str) -> Option<usize> {
        self.index.get(team_id).copied()
    }

    pub fn team(&self, idx: usize) -> &Team {
        &self.teams[idx]
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Points per team in index order; the starting totals of every trial.
    pub fn points(&self) -> Vec<u32> {
        self.teams.iter().map(|t| t.points).collect()
    }

    pub fn total_points(&self) -> u64 {
        self.teams.iter().map(|t| t.points as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
