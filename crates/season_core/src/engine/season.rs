//! # Season Simulator
//!
//! Replays every remaining fixture `trial_count` times against the current
//! standings.
//!
//! ## Randomness
//! Each trial owns a ChaCha8 generator seeded from the run seed, with the
//! trial index selecting the ChaCha stream. A trial's result therefore does
//! not depend on which worker ran it or in what order, and sequential and
//! parallel runs aggregate to the same table.
//!
//! ## Atomicity
//! All inputs are validated while building the simulator. Once trials start
//! nothing can fail, so a run either produces every trial or none.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use super::outcome_model::{FixtureSampler, OutcomeModel};
use super::standings::{FinalStandingsSnapshot, StandingsAggregator};
use crate::error::{Result, SimError};
use crate::models::{CurrentStandings, Fixture};

/// Fresh generator for one trial.
#[inline]
pub fn trial_rng(seed: u64, trial_index: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial_index);
    rng
}

/// A fixture resolved to team indices with a validated sampler.
#[derive(Debug, Clone)]
pub struct PreparedFixture {
    pub home: usize,
    pub away: usize,
    sampler: FixtureSampler,
}

pub struct SeasonSimulator<'a> {
    standings: &'a CurrentStandings,
    fixtures: Vec<PreparedFixture>,
    seed: u64,
}

impl<'a> SeasonSimulator<'a> {
    /// Resolve teams and validate every fixture against the model.
    ///
    /// Fails with `UnknownTeam`, `InvalidModelInput` or `InvalidStandings`
    /// before any trial runs.
    pub fn new(
        standings: &'a CurrentStandings,
        fixtures: &[Fixture],
        model: &OutcomeModel,
        seed: u64,
    ) -> Result<Self> {
        let mut teams = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            let resolve = |team: &str| {
                standings.index_of(team).ok_or_else(|| SimError::UnknownTeam {
                    team: team.to_string(),
                    fixture: fixture.label(),
                })
            };
            let home = resolve(&fixture.home_team)?;
            let away = resolve(&fixture.away_team)?;
            if home == away {
                return Err(SimError::model_input(fixture.label(), "team cannot play itself"));
            }
            teams.push((home, away));
        }
        check_points_headroom(standings, &teams)?;

        let samplers = model.prepare_all(fixtures)?;
        let fixtures = teams
            .into_iter()
            .zip(samplers)
            .map(|((home, away), sampler)| PreparedFixture { home, away, sampler })
            .collect::<Vec<_>>();

        debug!(
            "Season simulator ready: {} teams, {} fixtures, seed {}",
            standings.len(),
            fixtures.len(),
            seed
        );

        Ok(Self { standings, fixtures, seed })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn standings(&self) -> &CurrentStandings {
        self.standings
    }

    pub fn fixtures(&self) -> &[PreparedFixture] {
        &self.fixtures
    }

    /// Final per-team totals of one trial, indexed like the standings.
    pub fn trial_totals(&self, trial_index: u64) -> Vec<u32> {
        let mut rng = trial_rng(self.seed, trial_index);
        let mut totals = self.standings.points();
        for fixture in &self.fixtures {
            let (home_points, away_points) = fixture.sampler.sample(&mut rng).points();
            totals[fixture.home] += home_points;
            totals[fixture.away] += away_points;
        }
        totals
    }

    pub fn run_trial(&self, trial_index: u64) -> FinalStandingsSnapshot {
        FinalStandingsSnapshot::rank(&self.trial_totals(trial_index))
    }

    /// Every trial's snapshot, in trial order.
    ///
    /// Buffers `trial_count × team_count` entries; prefer
    /// [`SeasonSimulator::simulate`] for large runs.
    pub fn run(&self, trial_count: u32) -> Result<Vec<FinalStandingsSnapshot>> {
        check_trial_count(trial_count)?;
        Ok((0..trial_count as u64).map(|t| self.run_trial(t)).collect())
    }

    /// Run and aggregate without keeping snapshots.
    pub fn simulate(&self, trial_count: u32, parallel: bool) -> Result<StandingsAggregator> {
        check_trial_count(trial_count)?;
        let team_count = self.standings.len();

        info!(
            "Simulating {} trials over {} fixtures ({})",
            trial_count,
            self.fixtures.len(),
            if parallel { "parallel" } else { "sequential" }
        );

        let aggregator = if parallel {
            (0..trial_count as u64)
                .into_par_iter()
                .fold(
                    || StandingsAggregator::new(team_count),
                    |mut agg, t| {
                        agg.record(&self.run_trial(t));
                        agg
                    },
                )
                .reduce(|| StandingsAggregator::new(team_count), StandingsAggregator::merged)
        } else {
            let mut agg = StandingsAggregator::new(team_count);
            for t in 0..trial_count as u64 {
                agg.record(&self.run_trial(t));
            }
            agg
        };

        debug!("Aggregated {} trials", aggregator.trials());
        Ok(aggregator)
    }
}

/// A team winning every remaining fixture must still fit in `u32`.
fn check_points_headroom(standings: &CurrentStandings, teams: &[(usize, usize)]) -> Result<()> {
    let mut remaining = vec![0u64; standings.len()];
    for &(home, away) in teams {
        remaining[home] += 1;
        remaining[away] += 1;
    }
    for (idx, games) in remaining.into_iter().enumerate() {
        let team = standings.team(idx);
        let ceiling = team.points as u64 + 3 * games;
        if ceiling > u32::MAX as u64 {
            return Err(SimError::InvalidStandings(format!(
                "{} at {} points with {} fixtures left exceeds the points range",
                team.id, team.points, games
            )));
        }
    }
    Ok(())
}

fn check_trial_count(trial_count: u32) -> Result<()> {
    if trial_count == 0 {
        return Err(SimError::InvalidConfig("trial_count must be >= 1".to_string()));
    }
    Ok(())
}

/// One-shot form: validate, then return every trial's snapshot.
pub fn run(
    trial_count: u32,
    standings: &CurrentStandings,
    fixtures: &[Fixture],
    model: &OutcomeModel,
    seed: u64,
) -> Result<Vec<FinalStandingsSnapshot>> {
    SeasonSimulator::new(standings, fixtures, model, seed)?.run(trial_count)
}
