use serde::{Deserialize, Serialize};

use super::{EconomyView, GainsTaxation, InterestRate, Ownable};
use crate::error::ConfigError;
use crate::fiscal::FiscalModel;
use crate::ownership::Ownership;

/// Capital paid back at the end of a periodic investment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Liquidation {
    pub brut: f64,
    pub gains: f64,
    pub taxes: f64,
}

impl Liquidation {
    #[must_use]
    pub fn net(&self) -> f64 {
        self.brut - self.taxes
    }
}

/// Yearly payments from `first_year` to `last_year`, liquidated during `last_year`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicInvestment {
    pub name: String,
    pub ownership: Ownership,
    #[serde(default)]
    pub initial_value: f64,
    pub yearly_payment: f64,
    pub first_year: i32,
    pub last_year: i32,
    pub interest_rate: InterestRate,
    #[serde(default)]
    pub taxation: GainsTaxation,
}

impl PeriodicInvestment {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.last_year < self.first_year {
            return Err(ConfigError::invalid(
                format!("{}.last_year", self.name),
                "must not be before first_year",
            ));
        }
        if self.initial_value < 0.0 || self.yearly_payment < 0.0 {
            return Err(ConfigError::invalid(
                format!("{}.yearly_payment", self.name),
                "amounts must be non-negative",
            ));
        }
        Ok(())
    }

    /// Capital after `nb_years` of payments and capitalisation
    fn accumulated(&self, nb_years: i32, rate: f64) -> f64 {
        let growth = (1.0 + rate).powi(nb_years);
        let payments = if rate.abs() < 1e-12 {
            self.yearly_payment * f64::from(nb_years)
        } else {
            self.yearly_payment * (growth - 1.0) / rate
        };
        self.initial_value * growth + payments
    }

    /// Payment due during `year`
    #[must_use]
    pub fn payment(&self, year: i32) -> f64 {
        if (self.first_year..=self.last_year).contains(&year) {
            self.yearly_payment
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn liquidation(
        &self,
        year: i32,
        economy: &EconomyView,
        fiscal: &FiscalModel,
    ) -> Option<Liquidation> {
        if year != self.last_year {
            return None;
        }
        let nb_years = self.last_year - self.first_year + 1;
        let rate = self.interest_rate.real(&economy.rates, economy.inflation);
        let brut = self.accumulated(nb_years, rate);
        let invested = self.initial_value + self.yearly_payment * f64::from(nb_years);
        let gains = (brut - invested).max(0.0);
        Some(Liquidation {
            brut,
            gains,
            taxes: self.taxation.taxes(gains, fiscal),
        })
    }
}

impl Ownable for PeriodicInvestment {
    fn name(&self) -> &str {
        &self.name
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }

    fn value(&self, year: i32, economy: &EconomyView) -> f64 {
        if year < self.first_year || year >= self.last_year {
            return 0.0;
        }
        let rate = self.interest_rate.real(&economy.rates, economy.inflation);
        self.accumulated(year - self.first_year + 1, rate)
    }
}
