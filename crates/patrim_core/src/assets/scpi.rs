use serde::{Deserialize, Serialize};

use super::real_estate::Sale;
use super::{EconomyView, Ownable};
use crate::error::ConfigError;
use crate::fiscal::{FiscalModel, Revenue};
use crate::ownership::Ownership;

/// Shares of a real-estate investment company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scpi {
    pub name: String,
    pub ownership: Ownership,
    pub buying_year: i32,
    pub buying_price: f64,
    /// Yearly distribution, in fraction of the current value
    pub yearly_return: f64,
    /// Yearly revaluation of the shares, in constant euros
    #[serde(default)]
    pub revaluation_rate: f64,
    #[serde(default)]
    pub selling_year: Option<i32>,
}

impl Scpi {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(selling_year) = self.selling_year
            && selling_year <= self.buying_year
        {
            return Err(ConfigError::invalid(
                format!("{}.selling_year", self.name),
                "must be after the buying year",
            ));
        }
        if self.revaluation_rate <= -1.0 {
            return Err(ConfigError::invalid(
                format!("{}.revaluation_rate", self.name),
                "must be greater than -100 %",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_owned(&self, year: i32) -> bool {
        self.buying_year <= year && self.selling_year.is_none_or(|sold| year < sold)
    }

    fn revalued(&self, year: i32) -> f64 {
        self.buying_price * (1.0 + self.revaluation_rate).powi(year - self.buying_year)
    }

    /// Distribution received during `year`, taxed as property income
    #[must_use]
    pub fn revenue(&self, year: i32, fiscal: &FiscalModel) -> Revenue {
        if !self.is_owned(year) {
            return Revenue::default();
        }
        let brut = self.revalued(year) * self.yearly_return;
        Revenue {
            brut,
            net: brut * (1.0 - fiscal.rental_taxes.social_levies),
            taxable: brut,
        }
    }

    #[must_use]
    pub fn purchase(&self, year: i32) -> f64 {
        if year == self.buying_year {
            self.buying_price
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn sale(&self, year: i32, fiscal: &FiscalModel) -> Option<Sale> {
        if self.selling_year != Some(year) {
            return None;
        }
        let price = self.revalued(year);
        let holding_years = u32::try_from(year - self.buying_year).unwrap_or(0);
        Some(Sale {
            price,
            taxes: fiscal
                .capital_gain_taxes
                .taxes(self.buying_price, price, holding_years, false),
        })
    }
}

impl Ownable for Scpi {
    fn name(&self) -> &str {
        &self.name
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }

    fn value(&self, year: i32, _economy: &EconomyView) -> f64 {
        if self.is_owned(year) {
            self.revalued(year)
        } else {
            0.0
        }
    }
}
