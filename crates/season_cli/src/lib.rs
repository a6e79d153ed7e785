//! Season Projection CLI Library
//!
//! CSV tables → season_core projection → CSV/JSON outputs.
//! Inputs are fully loaded before simulation starts and outputs are only
//! written after it succeeds.

pub mod output;
pub mod tables;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use season_core::{
    project_season, OutcomeModel, PoissonConfig, ProbabilityFormat, RatingTable, SeasonProjection,
    SeasonSimulator, SimulationConfig,
};

pub use tables::{load_fixtures, load_ratings, load_standings, ParseStats};

/// Which outcome model to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    Probability,
    Ratings,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "probability" | "prob" => Ok(ModelKind::Probability),
            "ratings" | "rating" | "poisson" => Ok(ModelKind::Ratings),
            other => Err(format!("unknown model '{}' (expected probability or ratings)", other)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelKind::Probability => write!(f, "probability"),
            ModelKind::Ratings => write!(f, "ratings"),
        }
    }
}

/// Optional JSON config file: `{"simulation": {...}, "poisson": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub simulation: SimulationConfig,
    pub poisson: PoissonConfig,
}

pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Run metadata written next to the JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub season: String,
    pub seed: u64,
    pub trial_count: u32,
    pub model: String,
    pub teams: usize,
    pub fixtures: usize,
    pub skipped_played: u32,
    /// RFC3339
    pub created_at: String,
    pub engine_version: String,
}

#[derive(Debug, Clone)]
pub struct InputPaths {
    pub standings: PathBuf,
    pub fixtures: PathBuf,
    pub ratings: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub inputs: InputPaths,
    pub model: ModelKind,
    pub config: ConfigFile,
    pub format: ProbabilityFormat,
    pub out: PathBuf,
    pub json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ProjectOutcome {
    pub projection: SeasonProjection,
    pub metadata: RunMetadata,
}

fn build_model(kind: ModelKind, poisson: &PoissonConfig, ratings: Option<RatingTable>) -> OutcomeModel {
    match kind {
        ModelKind::Probability => OutcomeModel::Probability,
        ModelKind::Ratings => OutcomeModel::ratings(poisson.clone(), ratings.unwrap_or_default()),
    }
}

/// Load, project, then write. Nothing is written unless the run succeeds.
pub fn run_project(opts: &ProjectOptions) -> Result<ProjectOutcome> {
    let standings = load_standings(&opts.inputs.standings)?;
    let (fixtures, stats) = load_fixtures(&opts.inputs.fixtures, opts.model)?;
    let ratings = opts.inputs.ratings.as_deref().map(load_ratings).transpose()?;
    tracing::info!(
        "Loaded {} teams, {} remaining fixtures ({} played skipped)",
        standings.len(),
        stats.remaining,
        stats.skipped_played
    );

    let model = build_model(opts.model, &opts.config.poisson, ratings);
    let projection = project_season(&opts.config.simulation, &standings, &fixtures, &model)?;

    let metadata = RunMetadata {
        season: projection.season.clone(),
        seed: projection.seed,
        trial_count: projection.trial_count,
        model: projection.model.clone(),
        teams: standings.len(),
        fixtures: fixtures.len(),
        skipped_played: stats.skipped_played,
        created_at: chrono::Utc::now().to_rfc3339(),
        engine_version: season_core::VERSION.to_string(),
    };

    let rows = projection.rows(opts.format);
    let mut outputs = vec![(opts.out.as_path(), output::projection_csv_bytes(&rows)?)];
    if let Some(json_path) = &opts.json {
        let document = serde_json::json!({ "metadata": &metadata, "records": &projection.records });
        outputs.push((json_path.as_path(), output::json_bytes(&document)?));
    }
    output::replace_files(&outputs)?;

    Ok(ProjectOutcome { projection, metadata })
}

/// Summary of an input check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCheck {
    pub teams: usize,
    pub fixtures: usize,
    pub stats: ParseStats,
}

/// Load and validate inputs against the model without simulating.
pub fn check_inputs(inputs: &InputPaths, kind: ModelKind, poisson: &PoissonConfig) -> Result<InputCheck> {
    let standings = load_standings(&inputs.standings)?;
    let (fixtures, stats) = load_fixtures(&inputs.fixtures, kind)?;
    let ratings = inputs.ratings.as_deref().map(load_ratings).transpose()?;
    let model = build_model(kind, poisson, ratings);

    let simulator = SeasonSimulator::new(&standings, &fixtures, &model, 0)?;
    Ok(InputCheck { teams: standings.len(), fixtures: simulator.fixtures().len(), stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn options(dir: &Path, standings: &str, fixtures: &str) -> ProjectOptions {
        let config = ConfigFile {
            simulation: SimulationConfig { top_k: 1, ..SimulationConfig::test() },
            ..ConfigFile::default()
        };
        ProjectOptions {
            inputs: InputPaths {
                standings: write(dir, "standings.csv", standings),
                fixtures: write(dir, "fixtures.csv", fixtures),
                ratings: None,
            },
            model: ModelKind::Probability,
            config,
            format: ProbabilityFormat::Percent,
            out: dir.join("projections.csv"),
            json: Some(dir.join("projections.json")),
        }
    }

    #[test]
    fn test_model_kind_parse() {
        assert_eq!("ratings".parse::<ModelKind>(), Ok(ModelKind::Ratings));
        assert_eq!("Probability".parse::<ModelKind>(), Ok(ModelKind::Probability));
        assert!("elo".parse::<ModelKind>().is_err());
        assert_eq!(ModelKind::Ratings.to_string(), "ratings");
    }

    #[test]
    fn test_run_project_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(
            dir.path(),
            "team,points\nA,10\nB,7\n",
            "home_team,away_team,prob_home_win,prob_draw,prob_away_win\nA,B,1.0,0.0,0.0\n",
        );

        let outcome = run_project(&opts).unwrap();
        assert_eq!(outcome.metadata.teams, 2);
        assert_eq!(outcome.metadata.fixtures, 1);
        assert_eq!(outcome.projection.records[0].team, "A");

        let csv_text = fs::read_to_string(&opts.out).unwrap();
        assert!(csv_text.lines().nth(1).unwrap().starts_with("A,10,13.0,1,100.0%"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(opts.json.as_ref().unwrap()).unwrap()).unwrap();
        assert_eq!(json["metadata"]["seed"], 42);
        assert_eq!(json["records"][1]["team"], "B");
    }

    #[test]
    fn test_failed_run_leaves_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(
            dir.path(),
            "team,points\nA,10\nB,7\n",
            "home_team,away_team,prob_home_win,prob_draw,prob_away_win\nA,Z,0.5,0.3,0.2\n",
        );
        fs::write(&opts.out, "previous").unwrap();

        let err = run_project(&opts).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<season_core::SimError>(),
            Some(season_core::SimError::UnknownTeam { .. })
        ));
        assert_eq!(fs::read_to_string(&opts.out).unwrap(), "previous");
        assert!(!opts.json.as_ref().unwrap().exists());
    }

    #[test]
    fn test_unwritable_json_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(
            dir.path(),
            "team,points\nA,10\nB,7\n",
            "home_team,away_team,prob_home_win,prob_draw,prob_away_win\nA,B,1.0,0.0,0.0\n",
        );
        fs::write(&opts.out, "previous").unwrap();
        fs::write(dir.path().join("blocker"), "file").unwrap();
        opts.json = Some(dir.path().join("blocker").join("out.json"));

        assert!(run_project(&opts).is_err());
        assert_eq!(fs::read_to_string(&opts.out).unwrap(), "previous");
    }

    #[test]
    fn test_all_played_is_empty_fixture_list() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(
            dir.path(),
            "team,points\nA,10\nB,7\n",
            "home_team,away_team,home_goals,away_goals\nA,B,1,0\n",
        );
        let err = run_project(&opts).unwrap_err();
        let sim = err.downcast_ref::<season_core::SimError>().unwrap();
        assert!(sim.is_nothing_to_simulate());
    }

    #[test]
    fn test_check_inputs_counts() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = InputPaths {
            standings: write(dir.path(), "s.csv", "team,points\nA,3\nB,3\nC,0\n"),
            fixtures: write(
                dir.path(),
                "f.csv",
                "home_team,away_team,home_rating,away_rating,home_goals,away_goals\n\
                 A,B,60,50,,\nB,C,55,40,2,2\nC,A,,,,\n",
            ),
            ratings: Some(write(dir.path(), "r.csv", "team,rating\nC,45\nA,62\n")),
        };
        let check = check_inputs(&inputs, ModelKind::Ratings, &PoissonConfig::default()).unwrap();
        assert_eq!(check.teams, 3);
        assert_eq!(check.fixtures, 2);
        assert_eq!(check.stats.skipped_played, 1);
    }

    #[test]
    fn test_load_config_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "config.json", r#"{"simulation": {"trial_count": 250}}"#);
        let config = load_config(&path).unwrap();
        assert_eq!(config.simulation.trial_count, 250);
        assert_eq!(config.poisson, PoissonConfig::default());
    }
}
