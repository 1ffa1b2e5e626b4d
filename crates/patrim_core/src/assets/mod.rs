//! Assets and liabilities of the household

mod free_investment;
mod loan;
mod patrimoine;
mod periodic_investment;
mod real_estate;
mod scpi;

pub use free_investment::{FreeInvestment, InvestmentState, InvestmentType, Withdrawal};
pub use loan::{Debt, Loan};
pub use patrimoine::{Assets, Liabilities, Patrimoine};
pub use periodic_investment::{Liquidation, PeriodicInvestment};
pub use real_estate::{RealEstateAsset, Rental, Sale};
pub use scpi::Scpi;

use serde::{Deserialize, Serialize};

use crate::economy::Rates;
use crate::fiscal::FiscalModel;
use crate::ownership::{EvaluationMethod, Ownership, ValuationContext};

/// Economic values of the current run needed to value assets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomyView {
    pub inflation: f64,
    /// Average rates of the run
    pub rates: Rates,
}

/// Anything with an owner and a value at the end of a year
pub trait Ownable {
    fn name(&self) -> &str;

    fn ownership(&self) -> &Ownership;

    fn ownership_mut(&mut self) -> &mut Ownership;

    fn value(&self, year: i32, economy: &EconomyView) -> f64;

    /// Paid to the clause recipients rather than to the legal heirs
    fn is_life_insurance(&self) -> bool {
        false
    }

    fn owned_value(
        &self,
        owner: &str,
        year: i32,
        economy: &EconomyView,
        method: EvaluationMethod,
        ctx: &ValuationContext<'_>,
    ) -> f64 {
        self.ownership()
            .owned_value(owner, self.value(year, economy), method, ctx)
    }
}

/// Return of an investment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InterestRate {
    /// Fixed nominal rate
    Contractual { rate: f64 },
    /// Mix of the market rates
    Market { stock_ratio: f64 },
}

impl InterestRate {
    #[must_use]
    pub fn nominal(&self, rates: &Rates) -> f64 {
        match self {
            InterestRate::Contractual { rate } => *rate,
            InterestRate::Market { stock_ratio } => rates.mixed(*stock_ratio),
        }
    }

    /// Rate in constant euros
    #[must_use]
    pub fn real(&self, rates: &Rates, inflation: f64) -> f64 {
        self.nominal(rates) - inflation
    }
}

/// Taxation of investment gains when withdrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GainsTaxation {
    /// Social levies plus flat income tax
    #[default]
    FlatTax,
    /// Tax wrappers (life insurance, PEA): social levies only
    SocialLeviesOnly,
}

impl GainsTaxation {
    #[must_use]
    pub fn rate(self, fiscal: &FiscalModel) -> f64 {
        match self {
            GainsTaxation::FlatTax => {
                fiscal.financial_taxes.social_levies + fiscal.financial_taxes.flat_income_tax
            }
            GainsTaxation::SocialLeviesOnly => fiscal.financial_taxes.social_levies,
        }
    }

    #[must_use]
    pub fn taxes(self, gains: f64, fiscal: &FiscalModel) -> f64 {
        gains.max(0.0) * self.rate(fiscal)
    }
}
