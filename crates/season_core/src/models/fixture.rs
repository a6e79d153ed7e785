use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Raw home/draw/away weights as supplied by the upstream model.
///
/// Not required to sum to 1; see [`crate::engine::outcome_model`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbabilities {
    pub const fn new(home_win: f64, draw: f64, away_win: f64) -> Self {
        Self { home_win, draw, away_win }
    }

    pub fn sum(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }
}

/// What a fixture row carries for the outcome model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixtureOdds {
    Probabilities(OutcomeProbabilities),
    Ratings { home: f64, away: f64 },
    /// Neither; only the ratings model can use it, via its rating table.
    Unrated,
}

/// A remaining match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home_team: String,
    pub away_team: String,
    pub odds: FixtureOdds,
}

impl Fixture {
    pub fn with_probabilities(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_win: f64,
        draw: f64,
        away_win: f64,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            odds: FixtureOdds::Probabilities(OutcomeProbabilities::new(home_win, draw, away_win)),
        }
    }

    pub fn with_ratings(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home: f64,
        away: f64,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            odds: FixtureOdds::Ratings { home, away },
        }
    }

    pub fn unrated(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self { home_team: home_team.into(), away_team: away_team.into(), odds: FixtureOdds::Unrated }
    }

    /// "Home vs Away", used in error messages and logs.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// Team-strength ratings keyed by team id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingTable {
    ratings: FxHashMap<String, f64>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same team replace earlier ones.
    pub fn insert(&mut self, team: impl Into<String>, rating: f64) {
        self.ratings.insert(team.into(), rating);
    }

    pub fn get(&self, team: &str) -> Option<f64> {
        self.ratings.get(team).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RatingTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = RatingTable::new();
        for (team, rating) in iter {
            table.insert(team, rating);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_table_last_insert_wins() {
        let table: RatingTable = vec![("A", 55.0), ("B", 40.0), ("A", 61.5)].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(61.5));
        assert_eq!(table.get("C"), None);
    }

    #[test]
    fn test_fixture_odds_json_shape() {
        let fixture = Fixture::with_ratings("A", "B", 60.0, 45.0);
        let json = serde_json::to_value(&fixture).unwrap();
        assert_eq!(json["odds"]["kind"], "ratings");
        assert_eq!(json["odds"]["home"], 60.0);

        let back: Fixture = serde_json::from_value(json).unwrap();
        assert_eq!(back, fixture);
    }
}
