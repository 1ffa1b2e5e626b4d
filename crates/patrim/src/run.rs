//! Running a scenario and writing its reports

use std::io::{self, Write};
use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr, eyre};
use patrim_core::model::{
    KpiResult, KpiStatistics, MonteCarloConfig, MonteCarloProgress, SocialAccounts,
};
use patrim_core::report::{balance_sheet_csv, cash_flow_csv, results_table_csv};
use patrim_core::{Model, Scenario, Simulation, SimulationMode};

use crate::storage::OutputDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RunMode {
    /// One projection with the expected value of every uncertain variable
    #[default]
    Deterministic,
    /// A Monte-Carlo batch of random runs
    Random,
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub first_year: i32,
    pub nb_years: u32,
    pub mode: RunMode,
    pub monte_carlo: MonteCarloConfig,
    /// Run number of the batch to replay into `run_<n>/`
    pub replay: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    Projection {
        files: Vec<PathBuf>,
        kpi_results: Vec<KpiResult>,
        ran_out_of_cash_in: Option<i32>,
        nb_successions: usize,
    },
    MonteCarlo {
        files: Vec<PathBuf>,
        statistics: Vec<KpiStatistics>,
        nb_runs: usize,
        nb_failures: usize,
        nb_ran_out_of_cash: usize,
        cancelled: bool,
    },
}

impl RunReport {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            RunReport::Projection { files, .. } | RunReport::MonteCarlo { files, .. } => files,
        }
    }
}

fn write_accounts(accounts: &SocialAccounts, output: &OutputDirectory) -> Result<Vec<PathBuf>> {
    Ok(vec![
        output.write_with("balance_sheet.csv", |w| {
            balance_sheet_csv(&accounts.balance_sheets, w)
        })?,
        output.write_with("cash_flow.csv", |w| cash_flow_csv(&accounts.cash_flows, w))?,
        output.write_json("successions.json", &accounts.successions)?,
    ])
}

/// Run `scenario` as requested and write the reports into `output`
pub fn run(
    scenario: &Scenario,
    model: &mut Model,
    request: &RunRequest,
    output: &OutputDirectory,
) -> Result<RunReport> {
    let mut simulation = Simulation::new(request.first_year, request.nb_years);
    match request.mode {
        RunMode::Deterministic => {
            let outcome = simulation
                .run_one(scenario, model, SimulationMode::Deterministic)
                .wrap_err("Deterministic projection failed")?;
            let files = write_accounts(&outcome.accounts, output)?;
            tracing::info!(
                years = outcome.accounts.balance_sheets.len(),
                "projection written to {}",
                output.root().display()
            );
            Ok(RunReport::Projection {
                files,
                kpi_results: outcome.kpi_results.clone(),
                ran_out_of_cash_in: outcome.ran_out_of_cash_in,
                nb_successions: outcome.accounts.successions.len(),
            })
        }
        RunMode::Random => {
            let result = simulation
                .monte_carlo(
                    scenario,
                    model,
                    &request.monte_carlo,
                    &MonteCarloProgress::new(),
                )
                .wrap_err("Monte-Carlo batch failed")?;
            for failure in &result.failures {
                tracing::warn!(
                    run = failure.run_number,
                    seed = failure.seed,
                    "run failed: {}",
                    failure.error
                );
            }
            let mut files =
                vec![output.write_with("results.csv", |w| results_table_csv(&result.lines, w))?];

            if let Some(run_number) = request.replay {
                let line = result
                    .lines
                    .iter()
                    .find(|l| l.run_number == run_number)
                    .ok_or_else(|| eyre!("Run {} is not part of the batch", run_number))?;
                let outcome = simulation
                    .replay(scenario, model, line)
                    .wrap_err_with(|| format!("Replay of run {} failed", run_number))?;
                let run_output = OutputDirectory::new(output.root().join(format!("run_{run_number}")));
                files.extend(write_accounts(&outcome.accounts, &run_output)?);
            }

            Ok(RunReport::MonteCarlo {
                files,
                statistics: result.statistics(&scenario.kpis),
                nb_runs: result.lines.len(),
                nb_failures: result.failures.len(),
                nb_ran_out_of_cash: result.nb_ran_out_of_cash(),
                cancelled: result.cancelled,
            })
        }
    }
}

fn format_amount(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.0}", v.round() + 0.0))
}

/// Human-readable summary of a report
pub fn write_summary<W: Write>(report: &RunReport, writer: &mut W) -> io::Result<()> {
    match report {
        RunReport::Projection {
            kpi_results,
            ran_out_of_cash_in,
            nb_successions,
            ..
        } => {
            writeln!(writer, "Deterministic projection")?;
            match ran_out_of_cash_in {
                Some(year) => writeln!(writer, "  Ran out of cash in {year}")?,
                None => writeln!(writer, "  Every year funded")?,
            }
            writeln!(writer, "  Successions: {nb_successions}")?;
            for kpi in kpi_results {
                writeln!(
                    writer,
                    "  {}: {} (objective {})",
                    kpi.name,
                    format_amount(kpi.value),
                    if kpi.objective_reached { "reached" } else { "missed" }
                )?;
            }
        }
        RunReport::MonteCarlo {
            statistics,
            nb_runs,
            nb_failures,
            nb_ran_out_of_cash,
            cancelled,
            ..
        } => {
            writeln!(writer, "Monte-Carlo batch: {nb_runs} runs")?;
            if *cancelled {
                writeln!(writer, "  Cancelled before completion")?;
            }
            if *nb_failures > 0 {
                writeln!(writer, "  Failed runs: {nb_failures}")?;
            }
            writeln!(writer, "  Ran out of cash: {nb_ran_out_of_cash}")?;
            for stats in statistics {
                writeln!(
                    writer,
                    "  {}: mean {}, quantile {}, probability {:.1}% (objective {})",
                    stats.name,
                    format_amount(stats.mean),
                    format_amount(stats.quantile),
                    stats.probability_of_objective * 100.0,
                    if stats.objective_reached { "reached" } else { "missed" }
                )?;
            }
        }
    }
    for file in report.files() {
        writeln!(writer, "  Wrote {}", file.display())?;
    }
    Ok(())
}
