//! Key performance indicators of a run and their Monte-Carlo statistics

use serde::{Deserialize, Serialize};

use super::social_accounts::{ALL_ADULTS, SocialAccounts};
use crate::error::ConfigError;
use crate::person::Family;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KpiKind {
    /// Lowest net worth of the adults while one of them is alive
    MinimumAssets,
    /// Net worth of the adults at the end of the year of the first death
    AssetsAtFirstDeath,
    /// Net worth of the adults at the end of the year of the last death
    AssetsAtLastDeath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub name: String,
    pub kind: KpiKind,
    /// Value to reach, in constant euros
    pub objective: f64,
    /// Required probability of reaching the objective
    pub probability_objective: f64,
}

impl Kpi {
    pub fn new(
        name: impl Into<String>,
        kind: KpiKind,
        objective: f64,
        probability_objective: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            objective,
            probability_objective,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.probability_objective) {
            return Err(ConfigError::invalid(
                format!("{}.probability_objective", self.name),
                "must lie in [0, 1]",
            ));
        }
        Ok(())
    }

    /// Value reached in one run; `None` when the event never happens during
    /// the simulated years
    #[must_use]
    pub fn value(&self, accounts: &SocialAccounts, family: &Family) -> Option<f64> {
        let net_worth = |year: i32| {
            accounts
                .balance_sheet(year)
                .map(|line| line.net_worth_of(ALL_ADULTS))
        };
        let mut death_years: Vec<i32> = family.adults().map(|a| a.year_of_death()).collect();
        death_years.sort_unstable();

        match self.kind {
            KpiKind::MinimumAssets => {
                let last_death = death_years.last().copied().unwrap_or(i32::MAX);
                accounts
                    .balance_sheets
                    .iter()
                    .filter(|line| line.year < last_death)
                    .map(|line| line.net_worth_of(ALL_ADULTS))
                    .min_by(f64::total_cmp)
            }
            KpiKind::AssetsAtFirstDeath => death_years.first().and_then(|&y| net_worth(y)),
            KpiKind::AssetsAtLastDeath => death_years.last().and_then(|&y| net_worth(y)),
        }
    }

    #[must_use]
    pub fn result(&self, accounts: &SocialAccounts, family: &Family) -> KpiResult {
        let value = self.value(accounts, family);
        KpiResult {
            name: self.name.clone(),
            value,
            objective_reached: value.is_some_and(|v| v >= self.objective),
        }
    }

    /// Statistics over the values of a batch; runs without a value are ignored
    #[must_use]
    pub fn statistics<'a>(&self, results: impl IntoIterator<Item = &'a KpiResult>) -> KpiStatistics {
        let mut values: Vec<f64> = results
            .into_iter()
            .filter(|r| r.name == self.name)
            .filter_map(|r| r.value)
            .collect();
        values.sort_by(f64::total_cmp);

        let nb_values = values.len();
        if nb_values == 0 {
            return KpiStatistics {
                name: self.name.clone(),
                nb_values,
                mean: None,
                quantile: None,
                probability_of_objective: 0.0,
                objective_reached: false,
            };
        }
        let mean = values.iter().sum::<f64>() / nb_values as f64;
        let quantile = quantile(&values, 1.0 - self.probability_objective);
        let reached = values.iter().filter(|v| **v >= self.objective).count();
        KpiStatistics {
            name: self.name.clone(),
            nb_values,
            mean: Some(mean),
            quantile: Some(quantile),
            probability_of_objective: reached as f64 / nb_values as f64,
            objective_reached: quantile >= self.objective,
        }
    }
}

/// Value of one KPI in one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiResult {
    pub name: String,
    pub value: Option<f64>,
    pub objective_reached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiStatistics {
    pub name: String,
    pub nb_values: usize,
    pub mean: Option<f64>,
    /// Value reached with the required probability
    pub quantile: Option<f64>,
    /// Share of the runs reaching the objective
    pub probability_of_objective: f64,
    pub objective_reached: bool,
}

/// Linear interpolation between closest ranks of sorted `values`
fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let w = rank - lower as f64;
            sorted[lower] * (1.0 - w) + sorted[upper] * w
        }
    }
}
