/// Errors raised while preparing or running a season projection.
///
/// Every variant aborts the whole run: no partial projection is produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Malformed probability triple or rating.
    #[error("invalid model input for {fixture}: {reason}")]
    InvalidModelInput { fixture: String, reason: String },

    /// A fixture references a team that is not in the current standings.
    #[error("unknown team '{team}' in fixture {fixture}")]
    UnknownTeam { team: String, fixture: String },

    #[error("no remaining fixtures to simulate")]
    EmptyFixtureList,

    #[error("no teams loaded in current standings")]
    EmptyStandings,

    /// Standings rows that cannot form a league table (e.g. duplicate team).
    #[error("invalid standings: {0}")]
    InvalidStandings(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    pub(crate) fn model_input(fixture: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidModelInput { fixture: fixture.into(), reason: reason.into() }
    }

    /// True for the empty-input conditions that mean "nothing to simulate"
    /// rather than a malformed run.
    pub fn is_nothing_to_simulate(&self) -> bool {
        matches!(self, SimError::EmptyFixtureList | SimError::EmptyStandings)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
