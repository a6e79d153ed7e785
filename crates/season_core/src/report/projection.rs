use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::engine::sort_keys::compare_expected_desc_by_id;
use crate::engine::StandingsAggregator;
use crate::models::CurrentStandings;

/// Per-team summary of a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub team: String,
    pub current_points: u32,
    /// Mean final points over all trials
    pub expected_points: f64,
    pub points_std_dev: f64,
    pub most_likely_position: usize,
    pub prob_title: f64,
    pub prob_top_k: f64,
    pub prob_relegation: f64,
    /// Index 0 = first place
    pub position_probs: Vec<f64>,
}

/// Turns aggregated counts into [`ProjectionRecord`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionReporter {
    pub top_k: usize,
    pub relegation_band: usize,
}

impl Default for ProjectionReporter {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl ProjectionReporter {
    pub fn new(top_k: usize, relegation_band: usize) -> Self {
        Self { top_k, relegation_band }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.top_k, config.relegation_band)
    }

    /// One record per team, highest expected points first (ties by team id).
    pub fn report(&self, standings: &CurrentStandings, aggregator: &StandingsAggregator) -> Vec<ProjectionRecord> {
        let team_count = standings.len();
        let dist = aggregator.position_probabilities();
        let bottom_m = self.relegation_band.min(team_count);

        let mut records: Vec<ProjectionRecord> = standings
            .teams()
            .iter()
            .enumerate()
            .map(|(idx, team)| ProjectionRecord {
                team: team.id.clone(),
                current_points: team.points,
                expected_points: aggregator.expected_points(idx),
                points_std_dev: aggregator.points_std_dev(idx),
                most_likely_position: dist.most_likely_position(idx),
                prob_title: dist.get(idx, 1),
                prob_top_k: dist.band(idx, 1, self.top_k),
                prob_relegation: if bottom_m == 0 {
                    0.0
                } else {
                    dist.band(idx, team_count - bottom_m + 1, team_count)
                },
                position_probs: dist.row(idx).to_vec(),
            })
            .collect();

        records.sort_by(|a, b| compare_expected_desc_by_id(a.expected_points, &a.team, b.expected_points, &b.team));
        records
    }
}

// ============================================================================
// Output Rows
// ============================================================================

/// How probabilities are rendered in output rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityFormat {
    /// `0.423`
    #[default]
    Fraction,
    /// `"42.3%"`
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbabilityValue {
    Fraction(f64),
    Percent(String),
}

impl ProbabilityValue {
    pub fn new(p: f64, format: ProbabilityFormat) -> Self {
        match format {
            ProbabilityFormat::Fraction => ProbabilityValue::Fraction(p),
            ProbabilityFormat::Percent => ProbabilityValue::Percent(format_percent(p)),
        }
    }
}

/// One row of the persisted season projections table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonProjectionRow {
    pub team: String,
    pub current_points: u32,
    /// Rounded to one decimal
    pub expected_points: f64,
    pub most_likely_position: usize,
    pub prob_title: ProbabilityValue,
    /// Top-k band; the column keeps its name for the default k of 4
    pub prob_top4: ProbabilityValue,
    pub prob_relegation: ProbabilityValue,
}

impl ProjectionRecord {
    pub fn to_row(&self, format: ProbabilityFormat) -> SeasonProjectionRow {
        SeasonProjectionRow {
            team: self.team.clone(),
            current_points: self.current_points,
            expected_points: round_one_decimal(self.expected_points),
            most_likely_position: self.most_likely_position,
            prob_title: ProbabilityValue::new(self.prob_title, format),
            prob_top4: ProbabilityValue::new(self.prob_top_k, format),
            prob_relegation: ProbabilityValue::new(self.prob_relegation, format),
        }
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `0.4236` → `"42.4%"`
pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FinalStandingsSnapshot;
    use crate::models::Team;

    fn standings(points: &[(&str, u32)]) -> CurrentStandings {
        CurrentStandings::new(points.iter().map(|(id, p)| Team::new(*id, *p)).collect()).unwrap()
    }

    fn aggregate(team_count: usize, trials: &[&[u32]]) -> StandingsAggregator {
        let mut agg = StandingsAggregator::new(team_count);
        for totals in trials {
            agg.record(&FinalStandingsSnapshot::rank(totals));
        }
        agg
    }

    #[test]
    fn test_bands_and_ordering() {
        let table = standings(&[("A", 10), ("B", 9), ("C", 8), ("D", 7), ("E", 6)]);
        let agg = aggregate(5, &[&[20, 18, 16, 14, 12], &[12, 18, 16, 14, 20]]);
        let records = ProjectionReporter::new(2, 2).report(&table, &agg);

        let order: Vec<&str> = records.iter().map(|r| r.team.as_str()).collect();
        // A, C and E tie on 16.0 expected points; id order breaks it
        assert_eq!(order, vec!["B", "A", "C", "E", "D"]);

        let a = &records[1];
        assert_eq!(a.prob_title, 0.5);
        assert_eq!(a.prob_top_k, 0.5);
        assert_eq!(a.prob_relegation, 0.5);
        assert_eq!(a.most_likely_position, 1);

        let d = records.iter().find(|r| r.team == "D").unwrap();
        assert_eq!(d.prob_relegation, 1.0);
        assert_eq!(d.most_likely_position, 4);
    }

    #[test]
    fn test_zero_relegation_band() {
        let table = standings(&[("A", 3), ("B", 1)]);
        let agg = aggregate(2, &[&[3, 1]]);
        let records = ProjectionReporter::new(4, 0).report(&table, &agg);
        assert!(records.iter().all(|r| r.prob_relegation == 0.0));
        // top_k larger than the league covers everyone
        assert!(records.iter().all(|r| r.prob_top_k == 1.0));
    }

    #[test]
    fn test_row_formatting() {
        let record = ProjectionRecord {
            team: "A".into(),
            current_points: 40,
            expected_points: 61.26,
            points_std_dev: 4.0,
            most_likely_position: 2,
            prob_title: 0.10004,
            prob_top_k: 0.4236,
            prob_relegation: 0.0,
            position_probs: vec![],
        };

        let row = record.to_row(ProbabilityFormat::Percent);
        assert_eq!(row.expected_points, 61.3);
        assert_eq!(row.prob_top4, ProbabilityValue::Percent("42.4%".into()));
        assert_eq!(row.prob_relegation, ProbabilityValue::Percent("0.0%".into()));

        let row = record.to_row(ProbabilityFormat::Fraction);
        assert_eq!(row.prob_top4, ProbabilityValue::Fraction(0.4236));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["prob_top4"], 0.4236);
    }
}
