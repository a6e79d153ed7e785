//! Stable Sort Key Utilities
//!
//! Deterministic ordering for league tables and projection rows.
//!
//! ## Tie-break rule
//! Teams level on points are ordered by their row in the current standings
//! (the team index). Goal difference and head-to-head are not modelled, so a
//! tied pair always resolves the same way in every trial.
//!
//! ## Usage
//! ```ignore
//! rows.sort_by(|a, b| compare_points_desc_stable(a.points, a.team, b.points, b.team));
//! ```

use std::cmp::Ordering;

// ============================================================================
// Comparison Helpers
// ============================================================================

/// League table order.
///
/// # Ordering
/// - Primary: points descending
/// - Secondary: team index ascending
#[inline]
pub fn compare_points_desc_stable(a_points: u32, a_team: usize, b_points: u32, b_team: usize) -> Ordering {
    match b_points.cmp(&a_points) {
        Ordering::Equal => a_team.cmp(&b_team),
        other => other,
    }
}

/// Projection row order.
///
/// # Ordering
/// - Primary: expected points descending (`total_cmp`, NaN-safe)
/// - Secondary: team id ascending
#[inline]
pub fn compare_expected_desc_by_id(a_expected: f64, a_id: &str, b_expected: f64, b_id: &str) -> Ordering {
    match b_expected.total_cmp(&a_expected) {
        Ordering::Equal => a_id.cmp(b_id),
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================
