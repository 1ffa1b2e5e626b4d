//! Tests for the deterministic projection of a household
//!
//! These tests verify that:
//! - A run stops at the horizon or after the last adult's death
//! - Every year is funded by the free investments when they suffice
//! - Proportional expenses follow the size of the household
//! - Net worth is split between the members

use super::{FIRST_YEAR, household, model};
use crate::model::{ALL_ADULTS, ALL_PERSONS};
use crate::random::SimulationMode;
use crate::simulation::{Simulation, simulate};
use crate::simulation_state::{CASH_TOLERANCE, EXPENSES, TAXES, LOCAL_TAXES};

#[test]
fn test_run_stops_after_last_death() {
    let outcome = simulate(&household(), &model(), FIRST_YEAR, 40, SimulationMode::Deterministic)
        .unwrap();

    let years: Vec<i32> = outcome.accounts.balance_sheets.iter().map(|l| l.year).collect();
    assert_eq!(years.first(), Some(&2030));
    // Vanessa dies in 2052
    assert_eq!(years.last(), Some(&2052));
    assert_eq!(years.len(), 23);
    assert_eq!(outcome.accounts.cash_flows.len(), 23);
    assert_eq!(outcome.ran_out_of_cash_in, None);
}

#[test]
fn test_run_stops_at_horizon() {
    let mut simulation = Simulation::new(FIRST_YEAR, 5);
    simulation
        .run_one(&household(), &model(), SimulationMode::Deterministic)
        .unwrap();
    let accounts = simulation.accounts().unwrap();
    assert_eq!(accounts.balance_sheets.len(), 5);
    assert_eq!(accounts.balance_sheets[4].year, 2034);
    assert!(accounts.successions.is_empty());
}

#[test]
fn test_every_year_is_funded() {
    let outcome = simulate(&household(), &model(), FIRST_YEAR, 40, SimulationMode::Deterministic)
        .unwrap();
    for line in &outcome.accounts.cash_flows {
        assert!(
            line.unfunded().abs() < CASH_TOLERANCE,
            "year {} left {} unfunded",
            line.year,
            line.unfunded()
        );
        assert!(line.net_cash_flow() < 0.0);
    }
}

#[test]
fn test_expenses_follow_household_size() {
    let outcome = simulate(&household(), &model(), FIRST_YEAR, 40, SimulationMode::Deterministic)
        .unwrap();
    let accounts = &outcome.accounts;

    let expenses = |year: i32| accounts.cash_flow(year).unwrap().expenses.total();
    assert_eq!(expenses(2031), -30_000.0);
    // Lionel died in 2040
    assert_eq!(expenses(2040), -15_000.0);
    assert_eq!(expenses(2045), -15_000.0);

    let line = accounts.cash_flow(2031).unwrap();
    assert_eq!(line.expenses.name, EXPENSES);
    assert_eq!(line.taxes.name, TAXES);
    assert_eq!(line.taxes.value(LOCAL_TAXES), Some(-2_000.0));
}

#[test]
fn test_net_worth_split_between_members() {
    let outcome = simulate(&household(), &model(), FIRST_YEAR, 40, SimulationMode::Deterministic)
        .unwrap();
    let sheet = outcome.accounts.balance_sheet(2031).unwrap();

    let lionel = sheet.net_worth_of("Lionel");
    let vanessa = sheet.net_worth_of("Vanessa");
    assert!(lionel > 200_000.0);
    assert!(vanessa > lionel);
    assert!((lionel + vanessa - sheet.net_worth_of(ALL_ADULTS)).abs() < 1e-6);
    assert!((sheet.net_worth_of(ALL_PERSONS) - sheet.net_total()).abs() < 1e-6);
}

#[test]
fn test_kpis_of_deterministic_run() {
    let outcome = simulate(&household(), &model(), FIRST_YEAR, 40, SimulationMode::Deterministic)
        .unwrap();
    let accounts = &outcome.accounts;
    let at_first_death = outcome
        .kpi_results
        .iter()
        .find(|k| k.name == "At first death")
        .unwrap();
    assert_eq!(
        at_first_death.value,
        Some(accounts.balance_sheet(2040).unwrap().net_worth_of(ALL_ADULTS))
    );
    assert!(at_first_death.objective_reached);
    assert!(outcome.kpi_results.iter().all(|k| k.value.is_some()));
}
