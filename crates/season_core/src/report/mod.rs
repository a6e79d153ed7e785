//! Projection summaries and persisted output rows.

pub mod projection;

pub use projection::{
    format_percent, round_one_decimal, ProbabilityFormat, ProbabilityValue, ProjectionRecord,
    ProjectionReporter, SeasonProjectionRow,
};
