//! Season Projection CLI
//!
//! standings.csv + fixtures.csv → projected final standings (CSV/JSON)

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use season_cli::{ConfigFile, InputPaths, ModelKind, ProjectOptions};
#[cfg(feature = "cli")]
use season_core::{ProbabilityFormat, SimError, SimulationConfig};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "season_cli")]
#[command(about = "Project final league standings by Monte Carlo simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct Inputs {
    /// Current standings CSV (team,points)
    #[arg(long)]
    standings: PathBuf,

    /// Fixture CSV; rows with both goal columns filled are skipped
    #[arg(long)]
    fixtures: PathBuf,

    /// Team ratings CSV (team,rating), last row per team wins
    #[arg(long)]
    ratings: Option<PathBuf>,

    /// Outcome model: probability or ratings
    #[arg(long, default_value = "probability")]
    model: ModelKind,

    /// JSON config file with "simulation" and "poisson" sections
    #[arg(long)]
    config: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run a projection and write the results
    Project {
        #[command(flatten)]
        inputs: Inputs,

        /// Output CSV file path
        #[arg(long, default_value = "projections.csv")]
        out: PathBuf,

        /// Also write records and run metadata as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Number of trials
        #[arg(long)]
        trials: Option<u32>,

        /// Seed; a random one is generated and logged when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Qualification band size
        #[arg(long)]
        top_k: Option<usize>,

        /// Relegation band size
        #[arg(long)]
        relegation: Option<usize>,

        /// Season label
        #[arg(long)]
        season: Option<String>,

        /// Render probabilities as percentage strings
        #[arg(long, default_value = "false")]
        percent: bool,

        /// Run trials on a single thread
        #[arg(long, default_value = "false")]
        sequential: bool,
    },

    /// Load and check inputs without simulating
    Validate {
        #[command(flatten)]
        inputs: Inputs,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(feature = "cli")]
fn base_config(inputs: &Inputs) -> Result<ConfigFile> {
    match &inputs.config {
        Some(path) => season_cli::load_config(path),
        None => {
            let simulation = match inputs.model {
                ModelKind::Probability => SimulationConfig::probability_preset(),
                ModelKind::Ratings => SimulationConfig::ratings_preset(),
            };
            Ok(ConfigFile { simulation, ..ConfigFile::default() })
        }
    }
}

#[cfg(feature = "cli")]
fn input_paths(inputs: &Inputs) -> InputPaths {
    InputPaths {
        standings: inputs.standings.clone(),
        fixtures: inputs.fixtures.clone(),
        ratings: inputs.ratings.clone(),
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Project {
            inputs,
            out,
            json,
            trials,
            seed,
            top_k,
            relegation,
            season,
            percent,
            sequential,
        } => {
            let mut config = base_config(&inputs)?;
            let sim = &mut config.simulation;
            if let Some(trials) = trials {
                sim.trial_count = trials;
            }
            if seed.is_some() {
                sim.seed = seed;
            }
            if let Some(top_k) = top_k {
                sim.top_k = top_k;
            }
            if let Some(relegation) = relegation {
                sim.relegation_band = relegation;
            }
            if let Some(season) = season {
                sim.season = season;
            }
            if sequential {
                sim.parallel = false;
            }

            let format = if percent { ProbabilityFormat::Percent } else { ProbabilityFormat::Fraction };
            let opts = ProjectOptions {
                inputs: input_paths(&inputs),
                model: inputs.model,
                config,
                format,
                out,
                json,
            };

            let outcome = season_cli::run_project(&opts)?;
            let rows = outcome.projection.rows(format);
            print!("{}", season_cli::output::format_table(&outcome.projection.season, &rows));
            println!("\nSeed:    {}", outcome.metadata.seed);
            println!("Trials:  {}", outcome.metadata.trial_count);
            println!("Written: {}", opts.out.display());
            if let Some(json_path) = &opts.json {
                println!("Written: {}", json_path.display());
            }
        }

        Commands::Validate { inputs } => {
            let config = base_config(&inputs)?;
            let check = season_cli::check_inputs(&input_paths(&inputs), inputs.model, &config.poisson)?;
            println!("Inputs OK ({} model)", inputs.model);
            println!("   Teams:            {}", check.teams);
            println!("   Fixture rows:     {}", check.stats.total_rows);
            println!("   Already played:   {}", check.stats.skipped_played);
            println!("   To simulate:      {}", check.fixtures);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    init_tracing();

    if let Err(err) = run(Cli::parse()) {
        match err.downcast_ref::<SimError>() {
            Some(sim) if sim.is_nothing_to_simulate() => {
                eprintln!("Nothing to simulate: {}", sim);
                std::process::exit(2);
            }
            _ => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("season_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
