//! CSV input tables: current standings, remaining fixtures, team ratings.
//!
//! ## Formats
//! - standings: `team,points`
//! - fixtures: `home_team,away_team` plus any of
//!   `prob_home_win,prob_draw,prob_away_win`, `home_rating,away_rating`,
//!   `home_goals,away_goals`. Rows with both goal columns filled are already
//!   played and are skipped.
//! - ratings: `team,rating`. Later rows replace earlier ones, so a file sorted
//!   by date ends with each team's latest rating.

use std::path::Path;

use anyhow::{bail, Context, Result};
use season_core::{CurrentStandings, Fixture, FixtureOdds, OutcomeProbabilities, RatingTable, Team};
use serde::Deserialize;

use crate::ModelKind;

#[derive(Debug, Deserialize)]
struct StandingsRow {
    team: String,
    points: u32,
}

#[derive(Debug, Deserialize)]
struct FixtureRow {
    home_team: String,
    away_team: String,
    #[serde(default)]
    prob_home_win: Option<f64>,
    #[serde(default)]
    prob_draw: Option<f64>,
    #[serde(default)]
    prob_away_win: Option<f64>,
    #[serde(default)]
    home_rating: Option<f64>,
    #[serde(default)]
    away_rating: Option<f64>,
    #[serde(default)]
    home_goals: Option<u32>,
    #[serde(default)]
    away_goals: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    team: String,
    rating: f64,
}

/// Fixture CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub remaining: u32,
    pub skipped_played: u32,
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))
}

pub fn load_standings(path: &Path) -> Result<CurrentStandings> {
    let mut rdr = reader(path)?;
    let mut teams = Vec::new();
    for (line, row) in rdr.deserialize::<StandingsRow>().enumerate() {
        let row = row.with_context(|| format!("{}: bad standings row {}", path.display(), line + 2))?;
        teams.push(Team::new(row.team, row.points));
    }
    CurrentStandings::new(teams).with_context(|| format!("Invalid standings in {}", path.display()))
}

pub fn load_ratings(path: &Path) -> Result<RatingTable> {
    let mut rdr = reader(path)?;
    let mut table = RatingTable::new();
    for (line, row) in rdr.deserialize::<RatingRow>().enumerate() {
        let row = row.with_context(|| format!("{}: bad rating row {}", path.display(), line + 2))?;
        table.insert(row.team, row.rating);
    }
    Ok(table)
}

/// Remaining fixtures, with the odds the chosen model will read.
pub fn load_fixtures(path: &Path, model: ModelKind) -> Result<(Vec<Fixture>, ParseStats)> {
    let mut rdr = reader(path)?;
    let mut fixtures = Vec::new();
    let mut stats = ParseStats::default();

    for (line, row) in rdr.deserialize::<FixtureRow>().enumerate() {
        let row_no = line + 2;
        let row = row.with_context(|| format!("{}: bad fixture row {}", path.display(), row_no))?;
        stats.total_rows += 1;

        if row.home_goals.is_some() && row.away_goals.is_some() {
            stats.skipped_played += 1;
            continue;
        }

        let odds = fixture_odds(&row, model).with_context(|| format!("{}: fixture row {}", path.display(), row_no))?;
        fixtures.push(Fixture { home_team: row.home_team, away_team: row.away_team, odds });
        stats.remaining += 1;
    }

    Ok((fixtures, stats))
}

fn fixture_odds(row: &FixtureRow, model: ModelKind) -> Result<FixtureOdds> {
    let probabilities = match (row.prob_home_win, row.prob_draw, row.prob_away_win) {
        (Some(h), Some(d), Some(a)) => Some(OutcomeProbabilities::new(h, d, a)),
        (None, None, None) => None,
        _ => bail!("incomplete probability triple for {} vs {}", row.home_team, row.away_team),
    };
    let ratings = match (row.home_rating, row.away_rating) {
        (Some(home), Some(away)) => Some(FixtureOdds::Ratings { home, away }),
        (None, None) => None,
        _ => bail!("incomplete rating pair for {} vs {}", row.home_team, row.away_team),
    };

    let odds = match model {
        ModelKind::Probability => probabilities.map(FixtureOdds::Probabilities).or(ratings),
        ModelKind::Ratings => ratings.or(probabilities.map(FixtureOdds::Probabilities)),
    };
    Ok(odds.unwrap_or(FixtureOdds::Unrated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_standings_keeps_order() {
        let file = csv_file("team,points\nGalatasaray,45\nFenerbahce,44\nBesiktas,31\n");
        let standings = load_standings(file.path()).unwrap();
        assert_eq!(standings.len(), 3);
        assert_eq!(standings.index_of("Besiktas"), Some(2));
        assert_eq!(standings.team(0).points, 45);
    }

    #[test]
    fn test_empty_standings_is_sim_error() {
        let file = csv_file("team,points\n");
        let err = load_standings(file.path()).unwrap_err();
        let sim = err.downcast_ref::<season_core::SimError>().unwrap();
        assert!(sim.is_nothing_to_simulate());
    }

    #[test]
    fn test_load_fixtures_skips_played() {
        let file = csv_file(
            "home_team,away_team,prob_home_win,prob_draw,prob_away_win,home_goals,away_goals\n\
             A,B,0.5,0.3,0.2,2,1\n\
             B,A,0.4,0.3,0.3,,\n\
             A,C,0.6,0.2,0.2,,\n",
        );
        let (fixtures, stats) = load_fixtures(file.path(), ModelKind::Probability).unwrap();
        assert_eq!(stats, ParseStats { total_rows: 3, remaining: 2, skipped_played: 1 });
        assert_eq!(fixtures[0].home_team, "B");
        assert_eq!(
            fixtures[0].odds,
            FixtureOdds::Probabilities(OutcomeProbabilities::new(0.4, 0.3, 0.3))
        );
    }

    #[test]
    fn test_model_picks_matching_columns() {
        let file = csv_file(
            "home_team,away_team,prob_home_win,prob_draw,prob_away_win,home_rating,away_rating\n\
             A,B,0.5,0.3,0.2,70,40\n\
             A,C,,,,,\n",
        );
        let (fixtures, _) = load_fixtures(file.path(), ModelKind::Ratings).unwrap();
        assert_eq!(fixtures[0].odds, FixtureOdds::Ratings { home: 70.0, away: 40.0 });
        assert_eq!(fixtures[1].odds, FixtureOdds::Unrated);
    }

    #[test]
    fn test_partial_triple_rejected() {
        let file = csv_file("home_team,away_team,prob_home_win,prob_draw,prob_away_win\nA,B,0.5,,0.2\n");
        assert!(load_fixtures(file.path(), ModelKind::Probability).is_err());
    }

    #[test]
    fn test_ratings_last_row_wins() {
        let file = csv_file("team,rating\nA,50.5\nB,61\nA,55\n");
        let table = load_ratings(file.path()).unwrap();
        assert_eq!(table.get("A"), Some(55.0));
        assert_eq!(table.get("B"), Some(61.0));
    }
}
