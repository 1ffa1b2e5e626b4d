//! French fiscal rules as pure functions over immutable tables

mod capital_gains;
mod income_tax;
mod inheritance;
mod rate_grid;
mod social_taxes;

pub use capital_gains::RealEstateCapitalGainTaxes;
pub use income_tax::{IncomeTax, IncomeTaxes};
pub use inheritance::{Demembrement, InheritanceTaxes, LifeInsuranceTaxes, Relationship};
pub use rate_grid::{RateGrid, RateSlice, SliceAmount};
pub use social_taxes::{
    FinancialRevenueTaxes, PensionTaxes, RentalTaxes, Revenue, TurnoverTaxes, UnemploymentTaxes,
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalModel {
    pub income_taxes: IncomeTaxes,
    pub pension_taxes: PensionTaxes,
    pub turnover_taxes: TurnoverTaxes,
    pub unemployment_taxes: UnemploymentTaxes,
    pub financial_taxes: FinancialRevenueTaxes,
    pub rental_taxes: RentalTaxes,
    pub capital_gain_taxes: RealEstateCapitalGainTaxes,
    pub inheritance_taxes: InheritanceTaxes,
    pub life_insurance_taxes: LifeInsuranceTaxes,
    pub demembrement: Demembrement,
}

impl FiscalModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.income_taxes.validate()?;
        self.pension_taxes.validate()?;
        self.turnover_taxes.validate()?;
        self.unemployment_taxes.validate()?;
        self.financial_taxes.validate()?;
        self.rental_taxes.validate()?;
        self.capital_gain_taxes.validate()?;
        self.inheritance_taxes.validate()?;
        self.life_insurance_taxes.validate()?;
        self.demembrement.validate()
    }
}
