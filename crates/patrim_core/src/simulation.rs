use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::config::{Model, Scenario};
use crate::economy::{
    DictionaryOfAdultRandomProperties, EconomyRandomVariables, SocioEconomyRandomVariables,
};
use crate::error::{Result, SimulationError};
use crate::model::{
    FailedRun, KpiResult, MonteCarloConfig, MonteCarloProgress, MonteCarloResult,
    SimulationResultLine, SocialAccounts,
};
use crate::person::Family;
use crate::random::SimulationMode;
use crate::simulation_state::{SimulationState, horizon_last_year};

/// Everything a single run produces
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub accounts: SocialAccounts,
    /// Family as simulated, with the drawn life properties
    pub family: Family,
    pub kpi_results: Vec<KpiResult>,
    pub ran_out_of_cash_in: Option<i32>,
}

/// Run the yearly steps over `[first_year, first_year + nb_years)`.
///
/// The random variables of `model` must already be drawn or replayed when
/// `mode` is random.
pub fn simulate(
    scenario: &Scenario,
    model: &Model,
    first_year: i32,
    nb_years: u32,
    mode: SimulationMode,
) -> Result<RunOutcome> {
    let mut state = SimulationState::from_scenario(scenario, first_year, nb_years)?;
    while !state.is_finished() {
        state.step_year(model, mode)?;
    }
    let kpi_results = scenario
        .kpis
        .iter()
        .map(|kpi| kpi.result(&state.accounts, &state.family))
        .collect();
    Ok(RunOutcome {
        accounts: state.accounts,
        family: state.family,
        kpi_results,
        ran_out_of_cash_in: state.ran_out_of_cash_in,
    })
}

/// Values of the random variables of one run
struct RandomDraw {
    adults: DictionaryOfAdultRandomProperties,
    economy: EconomyRandomVariables,
    socio_economy: SocioEconomyRandomVariables,
}

/// Draw every random variable on private copies, then run
fn random_run(
    scenario: &Scenario,
    model: &Model,
    first_year: i32,
    nb_years: u32,
    seed: u64,
) -> Result<(RandomDraw, RunOutcome)> {
    let last_year = horizon_last_year(first_year, nb_years)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut scenario = scenario.clone();
    let mut model = model.clone();
    let config = &mut model.config;

    let draw = RandomDraw {
        adults: config
            .human_life
            .next_run(&mut rng, &mut scenario.family, first_year)?,
        economy: config.economy.next_run(
            &mut rng,
            config.simulate_volatility,
            first_year,
            last_year,
        )?,
        socio_economy: config.socio_economy.next_run(&mut rng)?,
    };
    let outcome = simulate(&scenario, &model, first_year, nb_years, SimulationMode::Random)?;
    Ok((draw, outcome))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationStatus {
    #[default]
    Created,
    Computing,
    Completed,
    Failed,
}

/// Projection of one scenario over a fixed horizon
#[derive(Debug, Clone)]
pub struct Simulation {
    pub first_year: i32,
    pub nb_years: u32,
    status: SimulationStatus,
    last_run: Option<RunOutcome>,
}

impl Simulation {
    #[must_use]
    pub fn new(first_year: i32, nb_years: u32) -> Self {
        Self {
            first_year,
            nb_years,
            status: SimulationStatus::Created,
            last_run: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn last_year(&self) -> Result<i32> {
        horizon_last_year(self.first_year, self.nb_years)
    }

    /// Accounts of the last completed single run
    pub fn accounts(&self) -> Result<&SocialAccounts> {
        match (&self.last_run, self.status) {
            (Some(run), SimulationStatus::Completed) => Ok(&run.accounts),
            _ => Err(SimulationError::InvalidStatus("no completed run")),
        }
    }

    fn start(&mut self) {
        self.status = SimulationStatus::Computing;
        self.last_run = None;
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        self.status = match result {
            Ok(_) => SimulationStatus::Completed,
            Err(_) => SimulationStatus::Failed,
        };
        result
    }

    /// Single run, with default values in deterministic mode or with the
    /// values last drawn or replayed in random mode
    pub fn run_one(
        &mut self,
        scenario: &Scenario,
        model: &Model,
        mode: SimulationMode,
    ) -> Result<&RunOutcome> {
        self.start();
        let result = scenario
            .validate()
            .map_err(SimulationError::from)
            .and_then(|()| simulate(scenario, model, self.first_year, self.nb_years, mode));
        let outcome = self.finish(result)?;
        Ok(self.last_run.insert(outcome))
    }

    /// Reproduce a recorded Monte-Carlo run
    pub fn replay(
        &mut self,
        scenario: &Scenario,
        model: &Model,
        line: &SimulationResultLine,
    ) -> Result<&RunOutcome> {
        self.start();
        let result = self.replayed(scenario, model, line);
        let outcome = self.finish(result)?;
        Ok(self.last_run.insert(outcome))
    }

    fn replayed(
        &self,
        scenario: &Scenario,
        model: &Model,
        line: &SimulationResultLine,
    ) -> Result<RunOutcome> {
        scenario.validate()?;
        let mut scenario = scenario.clone();
        let mut model = model.clone();
        let config = &mut model.config;
        config
            .human_life
            .set_random_values(&line.adults_random_properties, &mut scenario.family);
        config.economy.set_random_values(
            &line.economy,
            config.simulate_volatility,
            self.first_year,
            self.last_year()?,
        )?;
        config.socio_economy.set_random_values(&line.socio_economy);
        debug!(run = line.run_number, "replaying run");
        simulate(
            &scenario,
            &model,
            self.first_year,
            self.nb_years,
            SimulationMode::Random,
        )
    }

    /// Run `config.nb_runs` random runs.
    ///
    /// Runs are independent: each one draws on its own copies of the
    /// scenario and model from its own seed. A failed run is reported in
    /// the result without affecting the others. Cancelling through
    /// `progress` stops before the next run and keeps the completed ones.
    /// The drawn values are appended to the randomizer histories of `model`.
    pub fn monte_carlo(
        &mut self,
        scenario: &Scenario,
        model: &mut Model,
        config: &MonteCarloConfig,
        progress: &MonteCarloProgress,
    ) -> Result<MonteCarloResult> {
        self.start();
        if let Err(e) = scenario.validate() {
            return self.finish(Err(e.into()));
        }
        info!(nb_runs = config.nb_runs, seed = config.seed, "starting Monte-Carlo batch");

        let mut seeder = SmallRng::seed_from_u64(config.seed);
        let seeds: Vec<u64> = (0..config.nb_runs).map(|_| seeder.next_u64()).collect();
        let (first_year, nb_years) = (self.first_year, self.nb_years);
        let shared: &Model = model;

        let run = |(run_number, seed): (usize, u64)| {
            if progress.is_cancelled() {
                return None;
            }
            let result = random_run(scenario, shared, first_year, nb_years, seed);
            progress.increment();
            Some((run_number, seed, result))
        };

        #[cfg(feature = "parallel")]
        let runs: Vec<_> = seeds.into_par_iter().enumerate().map(run).collect();
        #[cfg(not(feature = "parallel"))]
        let runs: Vec<_> = seeds.into_iter().enumerate().map(run).collect();

        let mut result = MonteCarloResult::default();
        for (run_number, seed, outcome) in runs.into_iter().flatten() {
            match outcome {
                Ok((draw, outcome)) => {
                    model
                        .config
                        .human_life
                        .record_history(&scenario.family, &draw.adults);
                    model.config.economy.record_history(&draw.economy);
                    model.config.socio_economy.record_history(&draw.socio_economy);
                    result.lines.push(SimulationResultLine {
                        run_number,
                        seed,
                        adults_random_properties: draw.adults,
                        economy: draw.economy,
                        socio_economy: draw.socio_economy,
                        kpi_results: outcome.kpi_results,
                        ran_out_of_cash_in: outcome.ran_out_of_cash_in,
                    });
                }
                Err(error) => {
                    warn!(run_number, %error, "run failed");
                    result.failures.push(FailedRun {
                        run_number,
                        seed,
                        error,
                    });
                }
            }
        }
        result.lines.sort_by_key(|line| line.run_number);

        let nb_done = result.lines.len() + result.failures.len();
        result.cancelled = nb_done < config.nb_runs;
        info!(
            completed = result.lines.len(),
            failed = result.failures.len(),
            cancelled = result.cancelled,
            "Monte-Carlo batch finished"
        );
        if result.cancelled && nb_done == 0 {
            return self.finish(Err(SimulationError::Cancelled));
        }
        self.finish(Ok(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{
        Assets, FreeInvestment, InterestRate, InvestmentState, InvestmentType, Patrimoine,
    };
    use crate::config::{AdultBuilder, ModelConfig};
    use crate::expense::{LifeExpense, LifeExpenses, TimeSpan};
    use crate::model::{Kpi, KpiKind};
    use crate::ownership::Ownership;
    use crate::person::Sex;
    use jiff::civil::date;

    fn scenario() -> Scenario {
        Scenario {
            family: Family::from_members(vec![
                AdultBuilder::new("Lionel", Sex::Male, date(1960, 1, 1))
                    .age_of_death(85)
                    .build(),
            ])
            .unwrap(),
            patrimoine: Patrimoine {
                assets: Assets {
                    free_investments: vec![FreeInvestment::new(
                        "Savings",
                        Ownership::full("Lionel"),
                        InvestmentType::Other,
                        InterestRate::Market { stock_ratio: 0.5 },
                        InvestmentState {
                            investment: 500_000.0,
                            interest: 0.0,
                        },
                    )],
                    ..Default::default()
                },
                ..Default::default()
            },
            expenses: LifeExpenses {
                expenses: vec![LifeExpense::new(
                    "Daily",
                    20_000.0,
                    false,
                    TimeSpan::Permanent,
                )],
            },
            kpis: vec![Kpi::new("Minimum", KpiKind::MinimumAssets, 0.0, 0.9)],
        }
    }

    fn model() -> Model {
        Model::from_config(ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        let mut simulation = Simulation::new(2030, 10);
        assert_eq!(simulation.status(), SimulationStatus::Created);
        assert!(simulation.accounts().is_err());

        let outcome = simulation
            .run_one(&scenario(), &model(), SimulationMode::Deterministic)
            .unwrap();
        assert_eq!(outcome.accounts.balance_sheets.len(), 10);
        assert_eq!(simulation.status(), SimulationStatus::Completed);
        assert!(simulation.accounts().is_ok());

        let mut invalid = scenario();
        invalid.patrimoine.assets.free_investments[0].ownership = Ownership::full("Nobody");
        assert!(
            simulation
                .run_one(&invalid, &model(), SimulationMode::Deterministic)
                .is_err()
        );
        assert_eq!(simulation.status(), SimulationStatus::Failed);
    }

    #[test]
    fn test_monte_carlo_reproducible_from_seed() {
        let config = MonteCarloConfig {
            nb_runs: 8,
            seed: 7,
        };
        let mut first_model = model();
        let first = Simulation::new(2030, 20)
            .monte_carlo(&scenario(), &mut first_model, &config, &MonteCarloProgress::new())
            .unwrap();
        let second = Simulation::new(2030, 20)
            .monte_carlo(&scenario(), &mut model(), &config, &MonteCarloProgress::new())
            .unwrap();

        assert_eq!(first.lines.len(), 8);
        assert!(first.failures.is_empty());
        assert!(!first.cancelled);
        assert_eq!(first.lines, second.lines);
        assert!(first.lines.windows(2).all(|w| w[0].run_number < w[1].run_number));
        assert_eq!(first_model.economy().inflation.history().len(), 8);
    }

    #[test]
    fn test_replay_reproduces_run() {
        let config = MonteCarloConfig {
            nb_runs: 3,
            seed: 11,
        };
        let scenario = scenario();
        let model = model();
        let mut simulation = Simulation::new(2030, 25);
        let batch = simulation
            .monte_carlo(&scenario, &mut model.clone(), &config, &MonteCarloProgress::new())
            .unwrap();
        let line = &batch.lines[1];

        let replayed = simulation.replay(&scenario, &model, line).unwrap().clone();
        assert_eq!(replayed.kpi_results, line.kpi_results);
        assert_eq!(replayed.ran_out_of_cash_in, line.ran_out_of_cash_in);

        let again = simulation.replay(&scenario, &model, line).unwrap();
        assert_eq!(again.accounts, replayed.accounts);
    }

    #[test]
    fn test_replay_reproduces_accounts_of_each_run() {
        let scenario = crate::tests::household();
        let model = crate::tests::model();
        let mut simulation = Simulation::new(crate::tests::FIRST_YEAR, 40);
        for seed in [1, 7, 2024, 99_999] {
            let (draw, original) = random_run(
                &scenario,
                &model,
                simulation.first_year,
                simulation.nb_years,
                seed,
            )
            .unwrap();
            let line = SimulationResultLine {
                run_number: 0,
                seed,
                adults_random_properties: draw.adults,
                economy: draw.economy,
                socio_economy: draw.socio_economy,
                kpi_results: original.kpi_results.clone(),
                ran_out_of_cash_in: original.ran_out_of_cash_in,
            };
            let replayed = simulation.replay(&scenario, &model, &line).unwrap();
            assert_eq!(replayed.accounts, original.accounts, "seed {seed}");
            assert_eq!(replayed.kpi_results, original.kpi_results, "seed {seed}");
        }
    }

    #[test]
    fn test_overflowing_horizon_fails() {
        let mut simulation = Simulation::new(i32::MAX - 1, 10);
        assert!(simulation.last_year().is_err());
        assert!(
            simulation
                .run_one(&scenario(), &model(), SimulationMode::Deterministic)
                .is_err()
        );
        assert_eq!(simulation.status(), SimulationStatus::Failed);
        assert_eq!(Simulation::new(2030, 10).last_year(), Ok(2039));
    }

    #[test]
    fn test_cancelled_before_start() {
        let progress = MonteCarloProgress::new();
        progress.cancel();
        let mut simulation = Simulation::new(2030, 5);
        let result = simulation.monte_carlo(
            &scenario(),
            &mut model(),
            &MonteCarloConfig::default(),
            &progress,
        );
        assert_eq!(result, Err(SimulationError::Cancelled));
        assert_eq!(simulation.status(), SimulationStatus::Failed);
        assert_eq!(progress.completed(), 0);
    }
}
