use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::random::{RandomGenerator, Randomizer, SimulationMode};

/// Values drawn for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SocioEconomyRandomVariables {
    pub pension_devaluation_rate: f64,
    pub nb_trim_tauxplein: f64,
    pub expenses_under_evaluation_rate: f64,
}

/// Uncertainty on pensions and household spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocioEconomyModel {
    /// Yearly loss of purchasing power of pensions
    pub pension_devaluation_rate: Randomizer,
    /// Additional quarters required for a full-rate pension
    pub nb_trim_tauxplein: Randomizer,
    /// Underestimation of life expenses
    pub expenses_under_evaluation_rate: Randomizer,
}

impl Default for SocioEconomyModel {
    fn default() -> Self {
        Self {
            pension_devaluation_rate: Randomizer::unchecked(
                0.01,
                RandomGenerator::Beta {
                    alpha: 2.0,
                    beta: 2.0,
                    min: 0.0,
                    max: 0.02,
                },
            ),
            nb_trim_tauxplein: Randomizer::unchecked(
                0.0,
                RandomGenerator::Discrete {
                    pdf: vec![(0.0, 50.0), (2.0, 25.0), (4.0, 15.0), (6.0, 10.0)],
                },
            ),
            expenses_under_evaluation_rate: Randomizer::unchecked(
                0.0,
                RandomGenerator::Beta {
                    alpha: 2.0,
                    beta: 5.0,
                    min: 0.0,
                    max: 0.10,
                },
            ),
        }
    }
}

impl SocioEconomyModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.pension_devaluation_rate.generator.validate()?;
        self.nb_trim_tauxplein.generator.validate()?;
        self.expenses_under_evaluation_rate.generator.validate()
    }

    pub fn next_run<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<SocioEconomyRandomVariables, ModelError> {
        Ok(SocioEconomyRandomVariables {
            pension_devaluation_rate: self.pension_devaluation_rate.next(rng)?,
            nb_trim_tauxplein: self.nb_trim_tauxplein.next(rng)?,
            expenses_under_evaluation_rate: self.expenses_under_evaluation_rate.next(rng)?,
        })
    }

    pub fn set_random_values(&mut self, variables: &SocioEconomyRandomVariables) {
        self.pension_devaluation_rate
            .set_random_value(variables.pension_devaluation_rate);
        self.nb_trim_tauxplein
            .set_random_value(variables.nb_trim_tauxplein);
        self.expenses_under_evaluation_rate
            .set_random_value(variables.expenses_under_evaluation_rate);
    }

    #[must_use]
    pub fn pension_devaluation_rate(&self, mode: SimulationMode) -> f64 {
        self.pension_devaluation_rate.value(mode)
    }

    #[must_use]
    pub fn additional_quarters(&self, mode: SimulationMode) -> u32 {
        let quarters = self.nb_trim_tauxplein.value(mode).round().max(0.0);
        // bounded by the distribution support
        quarters as u32
    }

    #[must_use]
    pub fn expenses_under_evaluation_rate(&self, mode: SimulationMode) -> f64 {
        self.expenses_under_evaluation_rate.value(mode)
    }

    pub fn reset_random_history(&mut self) {
        self.pension_devaluation_rate.reset_random_history();
        self.nb_trim_tauxplein.reset_random_history();
        self.expenses_under_evaluation_rate.reset_random_history();
    }

    pub fn record_history(&mut self, variables: &SocioEconomyRandomVariables) {
        self.pension_devaluation_rate
            .record_history([variables.pension_devaluation_rate]);
        self.nb_trim_tauxplein
            .record_history([variables.nb_trim_tauxplein]);
        self.expenses_under_evaluation_rate
            .record_history([variables.expenses_under_evaluation_rate]);
    }
}
