use std::path::PathBuf;

use clap::Parser;
use patrim::{
    OutputDirectory, RunMode, RunRequest, default_data_dir, init_logging, load_model,
    load_scenario, run, write_summary,
};
use patrim_core::clock::{Clock, SystemClock};
use patrim_core::model::MonteCarloConfig;

#[derive(Parser, Debug)]
#[command(name = "patrim")]
#[command(about = "Household wealth projection for French tax residents")]
struct Args {
    /// Scenario file describing the family, its assets and expenses (YAML or JSON)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Model configuration file (default: built-in French 2022 model)
    #[arg(short, long)]
    model: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RunMode::Deterministic)]
    mode: RunMode,

    /// Number of Monte-Carlo runs
    #[arg(short, long, default_value_t = 100)]
    runs: usize,

    /// Seed of the Monte-Carlo batch
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// First simulated year (default: current year)
    #[arg(long)]
    first_year: Option<i32>,

    /// Number of simulated years
    #[arg(long, default_value_t = 60)]
    years: u32,

    /// Replay this run of the Monte-Carlo batch and write its accounts
    #[arg(long)]
    replay: Option<usize>,

    /// Directory receiving the reports
    #[arg(short, long, default_value = "patrim-output")]
    output: PathBuf,

    /// Path to the data directory (default: ~/.patrim/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    init_logging(&data_dir, &args.log_level)?;

    let scenario = load_scenario(&args.scenario)?;
    let mut model = load_model(args.model.as_deref())?;
    let first_year = args
        .first_year
        .unwrap_or_else(|| i32::from(SystemClock.today().year()));
    tracing::info!(
        scenario = %args.scenario.display(),
        model = model.version(),
        first_year,
        "starting"
    );

    let request = RunRequest {
        first_year,
        nb_years: args.years,
        mode: args.mode,
        monte_carlo: MonteCarloConfig {
            nb_runs: args.runs,
            seed: args.seed,
        },
        replay: args.replay,
    };
    let report = run(
        &scenario,
        &mut model,
        &request,
        &OutputDirectory::new(args.output),
    )?;

    write_summary(&report, &mut std::io::stdout().lock())?;
    tracing::info!("done");
    Ok(())
}
