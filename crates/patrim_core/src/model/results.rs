//! Monte-Carlo results table and batch progress

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::kpi::{Kpi, KpiResult, KpiStatistics};
use crate::economy::{DictionaryOfAdultRandomProperties, EconomyRandomVariables, SocioEconomyRandomVariables};

/// Random values and KPIs of one run; enough to replay it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResultLine {
    pub run_number: usize,
    pub seed: u64,
    pub adults_random_properties: DictionaryOfAdultRandomProperties,
    pub economy: EconomyRandomVariables,
    pub socio_economy: SocioEconomyRandomVariables,
    pub kpi_results: Vec<KpiResult>,
    /// First year whose deficit could not be funded
    pub ran_out_of_cash_in: Option<i32>,
}

impl SimulationResultLine {
    #[must_use]
    pub fn kpi(&self, name: &str) -> Option<&KpiResult> {
        self.kpi_results.iter().find(|k| k.name == name)
    }
}

/// A run of the batch that aborted
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRun {
    pub run_number: usize,
    pub seed: u64,
    pub error: crate::error::SimulationError,
}

/// Outcome of a Monte-Carlo batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonteCarloResult {
    /// Completed runs sorted by run number
    pub lines: Vec<SimulationResultLine>,
    pub failures: Vec<FailedRun>,
    /// The batch was stopped before every run was made
    pub cancelled: bool,
}

impl MonteCarloResult {
    #[must_use]
    pub fn statistics(&self, kpis: &[Kpi]) -> Vec<KpiStatistics> {
        kpis.iter()
            .map(|kpi| kpi.statistics(self.lines.iter().flat_map(|l| &l.kpi_results)))
            .collect()
    }

    #[must_use]
    pub fn nb_ran_out_of_cash(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.ran_out_of_cash_in.is_some())
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub nb_runs: usize,
    /// Seed of the batch; each run gets its own seed derived from it
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            nb_runs: 100,
            seed: 42,
        }
    }
}

/// Shared progress of a batch, readable from another thread
#[derive(Debug, Clone, Default)]
pub struct MonteCarloProgress {
    completed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Share existing atomics with a front end
    pub fn from_atomics(completed: Arc<AtomicUsize>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            completed,
            cancelled,
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Stop the batch before its next run
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
