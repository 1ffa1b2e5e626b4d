//! Tests for Monte-Carlo batches
//!
//! These tests verify that:
//! - Every run of a batch can be replayed exactly from its recorded values
//! - KPI statistics are computed over the completed runs
//! - Drawn values are appended to the model histories after each batch

use super::{FIRST_YEAR, household, model};
use crate::model::{MonteCarloConfig, MonteCarloProgress};
use crate::simulation::Simulation;

fn config(nb_runs: usize) -> MonteCarloConfig {
    MonteCarloConfig { nb_runs, seed: 2024 }
}

#[test]
fn test_each_run_replays_exactly() {
    let scenario = household();
    let model = model();
    let mut simulation = Simulation::new(FIRST_YEAR, 40);
    let batch = simulation
        .monte_carlo(&scenario, &mut model.clone(), &config(6), &MonteCarloProgress::new())
        .unwrap();
    assert_eq!(batch.lines.len(), 6);

    for line in &batch.lines {
        let replayed = simulation.replay(&scenario, &model, line).unwrap();
        assert_eq!(replayed.kpi_results, line.kpi_results, "run {}", line.run_number);
        assert_eq!(replayed.ran_out_of_cash_in, line.ran_out_of_cash_in);
        for (name, properties) in &line.adults_random_properties {
            let adult = replayed.family.member(name).unwrap();
            assert_eq!(adult.core.age_of_death, properties.age_of_death);
        }
    }
}

#[test]
fn test_statistics_over_batch() {
    let scenario = household();
    let mut model = model();
    let progress = MonteCarloProgress::new();
    let batch = Simulation::new(FIRST_YEAR, 40)
        .monte_carlo(&scenario, &mut model, &config(10), &progress)
        .unwrap();
    assert_eq!(progress.completed(), 10);

    let statistics = batch.statistics(&scenario.kpis);
    assert_eq!(statistics.len(), 3);
    let minimum = &statistics[0];
    assert_eq!(minimum.name, "Minimum");
    assert_eq!(minimum.nb_values, 10);
    assert!((0.0..=1.0).contains(&minimum.probability_of_objective));
    // the low quantile never exceeds the mean
    assert!(minimum.quantile.unwrap() <= minimum.mean.unwrap() + 1e-6);
}

#[test]
fn test_histories_accumulate_across_batches() {
    let scenario = household();
    let mut model = model();
    let mut simulation = Simulation::new(FIRST_YEAR, 10);
    for _ in 0..2 {
        simulation
            .monte_carlo(&scenario, &mut model, &config(4), &MonteCarloProgress::new())
            .unwrap();
    }
    assert_eq!(model.economy().inflation.history().len(), 8);
    assert_eq!(model.socio_economy().pension_devaluation_rate.history().len(), 8);
    // one man and one woman per run
    assert_eq!(model.human_life().men_life_expectancy.history().len(), 8);
    assert_eq!(model.human_life().women_life_expectancy.history().len(), 8);

    model.reset_random_history();
    assert!(model.economy().inflation.history().is_empty());
}
