//! Final tables and the position-count accumulator.
//!
//! A [`FinalStandingsSnapshot`] is one trial's ranked table. The
//! [`StandingsAggregator`] folds snapshots into a fixed team × position count
//! table so memory stays independent of the trial count.

use serde::{Deserialize, Serialize};

use super::sort_keys::compare_points_desc_stable;

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntry {
    /// Index into the current standings
    pub team: usize,
    pub points: u32,
}

/// One trial's final table, best team first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStandingsSnapshot {
    entries: Vec<StandingsEntry>,
}

impl FinalStandingsSnapshot {
    /// Rank per-team totals (indexed like the current standings) by points,
    /// ties going to the team listed earlier in the current standings.
    pub fn rank(totals: &[u32]) -> Self {
        let mut entries: Vec<StandingsEntry> = totals
            .iter()
            .enumerate()
            .map(|(team, &points)| StandingsEntry { team, points })
            .collect();
        entries.sort_by(|a, b| compare_points_desc_stable(a.points, a.team, b.points, b.team));
        Self { entries }
    }

    pub fn entries(&self) -> &[StandingsEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based finishing position of a team.
    pub fn position_of(&self, team: usize) -> Option<usize> {
        self.entries.iter().position(|e| e.team == team).map(|p| p + 1)
    }

    pub fn points_of(&self, team: usize) -> Option<u32> {
        self.entries.iter().find(|e| e.team == team).map(|e| e.points)
    }

    pub fn total_points(&self) -> u64 {
        self.entries.iter().map(|e| e.points as u64).sum()
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Streaming per-team position counts and point sums.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingsAggregator {
    team_count: usize,
    /// `position_counts[team * team_count + (position - 1)]`
    position_counts: Vec<u64>,
    points_sum: Vec<u64>,
    points_sq_sum: Vec<u128>,
    trials: u64,
}

impl StandingsAggregator {
    pub fn new(team_count: usize) -> Self {
        Self {
            team_count,
            position_counts: vec![0; team_count * team_count],
            points_sum: vec![0; team_count],
            points_sq_sum: vec![0; team_count],
            trials: 0,
        }
    }

    pub fn record(&mut self, snapshot: &FinalStandingsSnapshot) {
        debug_assert_eq!(snapshot.len(), self.team_count);
        let n = self.team_count;
        for (slot, entry) in snapshot.entries().iter().enumerate() {
            self.position_counts[entry.team * n + slot] += 1;
            let points = entry.points as u64;
            self.points_sum[entry.team] += points;
            self.points_sq_sum[entry.team] += (points as u128) * (points as u128);
        }
        self.trials += 1;
    }

    /// Element-wise sum of two partial tables over the same teams.
    pub fn merge(&mut self, other: &StandingsAggregator) {
        debug_assert_eq!(self.team_count, other.team_count);
        for (a, b) in self.position_counts.iter_mut().zip(&other.position_counts) {
            *a += b;
        }
        for (a, b) in self.points_sum.iter_mut().zip(&other.points_sum) {
            *a += b;
        }
        for (a, b) in self.points_sq_sum.iter_mut().zip(&other.points_sq_sum) {
            *a += b;
        }
        self.trials += other.trials;
    }

    pub fn merged(mut self, other: StandingsAggregator) -> Self {
        self.merge(&other);
        self
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Trials in which `team` finished at 1-based `position`.
    pub fn position_count(&self, team: usize, position: usize) -> u64 {
        self.position_counts[team * self.team_count + (position - 1)]
    }

    pub fn expected_points(&self, team: usize) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.points_sum[team] as f64 / self.trials as f64
    }

    /// Population standard deviation of a team's final points.
    pub fn points_std_dev(&self, team: usize) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let n = self.trials as f64;
        let mean = self.points_sum[team] as f64 / n;
        let variance = self.points_sq_sum[team] as f64 / n - mean * mean;
        variance.max(0.0).sqrt()
    }

    /// `count / trials` for every team and position.
    pub fn position_probabilities(&self) -> PositionDistribution {
        let probs = if self.trials == 0 {
            vec![0.0; self.position_counts.len()]
        } else {
            let n = self.trials as f64;
            self.position_counts.iter().map(|&c| c as f64 / n).collect()
        };
        PositionDistribution { team_count: self.team_count, probs }
    }
}

// ============================================================================
// Distribution
// ============================================================================

/// Probability mass per team and finishing position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDistribution {
    team_count: usize,
    probs: Vec<f64>,
}

impl PositionDistribution {
    pub fn team_count(&self) -> usize {
        self.team_count
    }

    /// Mass at 1-based `position`.
    pub fn get(&self, team: usize, position: usize) -> f64 {
        self.probs[team * self.team_count + (position - 1)]
    }

    /// All positions for one team, index 0 = first place.
    pub fn row(&self, team: usize) -> &[f64] {
        let start = team * self.team_count;
        &self.probs[start..start + self.team_count]
    }

    /// Mass over positions `from..=to` (1-based, clamped to the table).
    pub fn band(&self, team: usize, from: usize, to: usize) -> f64 {
        let from = from.max(1);
        let to = to.min(self.team_count);
        if from > to {
            return 0.0;
        }
        self.row(team)[from - 1..to].iter().sum()
    }

    /// Position with the largest mass; the better position wins ties.
    pub fn most_likely_position(&self, team: usize) -> usize {
        let mut best = 0;
        for (idx, &p) in self.row(team).iter().enumerate() {
            if p > self.row(team)[best] {
                best = idx;
            }
        }
        best + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_points_desc() {
        let snapshot = FinalStandingsSnapshot::rank(&[40, 52, 47]);
        let order: Vec<usize> = snapshot.entries().iter().map(|e| e.team).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(snapshot.position_of(0), Some(3));
        assert_eq!(snapshot.points_of(1), Some(52));
    }

    #[test]
    fn test_rank_ties_keep_standings_order() {
        // Teams 0, 2 and 3 all finish on 30
        let snapshot = FinalStandingsSnapshot::rank(&[30, 31, 30, 30]);
        let order: Vec<usize> = snapshot.entries().iter().map(|e| e.team).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_aggregator_counts_and_means() {
        let mut agg = StandingsAggregator::new(2);
        agg.record(&FinalStandingsSnapshot::rank(&[10, 7]));
        agg.record(&FinalStandingsSnapshot::rank(&[10, 13]));

        assert_eq!(agg.trials(), 2);
        assert_eq!(agg.position_count(0, 1), 1);
        assert_eq!(agg.position_count(0, 2), 1);
        assert_eq!(agg.expected_points(1), 10.0);
        assert!((agg.points_std_dev(1) - 3.0).abs() < 1e-12);
        assert_eq!(agg.points_std_dev(0), 0.0);
    }

    #[test]
    fn test_merge_equals_sequential_record() {
        let snaps: Vec<_> = [[5, 9, 2], [9, 5, 2], [2, 2, 9]]
            .iter()
            .map(|t| FinalStandingsSnapshot::rank(t))
            .collect();

        let mut all = StandingsAggregator::new(3);
        snaps.iter().for_each(|s| all.record(s));

        let mut left = StandingsAggregator::new(3);
        left.record(&snaps[0]);
        let mut right = StandingsAggregator::new(3);
        right.record(&snaps[1]);
        right.record(&snaps[2]);

        assert_eq!(left.merged(right), all);
    }

    #[test]
    fn test_distribution_rows_sum_to_one() {
        let mut agg = StandingsAggregator::new(3);
        agg.record(&FinalStandingsSnapshot::rank(&[3, 2, 1]));
        agg.record(&FinalStandingsSnapshot::rank(&[1, 2, 3]));
        agg.record(&FinalStandingsSnapshot::rank(&[2, 3, 1]));

        let dist = agg.position_probabilities();
        for team in 0..3 {
            let sum: f64 = dist.row(team).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_most_likely_position_prefers_better_place_on_tie() {
        let mut agg = StandingsAggregator::new(2);
        agg.record(&FinalStandingsSnapshot::rank(&[1, 0]));
        agg.record(&FinalStandingsSnapshot::rank(&[0, 1]));

        let dist = agg.position_probabilities();
        assert_eq!(dist.get(0, 1), 0.5);
        assert_eq!(dist.most_likely_position(0), 1);
        assert_eq!(dist.most_likely_position(1), 1);
    }

    #[test]
    fn test_band_clamps() {
        let mut agg = StandingsAggregator::new(3);
        agg.record(&FinalStandingsSnapshot::rank(&[3, 2, 1]));
        let dist = agg.position_probabilities();

        assert_eq!(dist.band(0, 1, 10), 1.0);
        assert_eq!(dist.band(2, 3, 3), 1.0);
        assert_eq!(dist.band(2, 4, 3), 0.0);
    }
}
