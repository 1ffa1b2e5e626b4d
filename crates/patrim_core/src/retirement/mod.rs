//! Pensions of the general and complementary regimes, reversion and
//! unemployment rights

mod regime_agirc;
mod regime_general;
mod unemployment;

pub use regime_agirc::RegimeAgirc;
pub use regime_general::{QuartersRequiredEntry, RegimeGeneral};
pub use unemployment::{DurationEntry, UnemploymentModel};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;
use crate::error::ConfigError;
use crate::fiscal::{FiscalModel, Revenue};
use crate::person::{Family, Person};

/// Socio-economic values applied to pensions during a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PensionContext {
    pub devaluation_rate: f64,
    pub additional_quarters: u32,
}

impl PensionContext {
    /// Share of a yearly pension liquidated on `liquidation` paid in `year`,
    /// devalued every year after the liquidation
    #[must_use]
    pub fn paid_share(&self, year: i32, liquidation: Date) -> f64 {
        let liquidation_year = i32::from(liquidation.year());
        let paid = match year.cmp(&liquidation_year) {
            std::cmp::Ordering::Less => return 0.0,
            std::cmp::Ordering::Equal => 1.0 - date_math::fraction_of_year_before(liquidation),
            std::cmp::Ordering::Greater => 1.0,
        };
        paid * (1.0 - self.devaluation_rate).powi(year - liquidation_year)
    }
}

/// Pension of one adult for one year, per regime
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pension {
    pub general: f64,
    pub agirc: f64,
    /// Received from a deceased spouse
    pub reversion: f64,
}

impl Pension {
    #[must_use]
    pub fn brut(&self) -> f64 {
        self.general + self.agirc + self.reversion
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementModel {
    pub regime_general: RegimeGeneral,
    pub regime_agirc: RegimeAgirc,
    pub unemployment: UnemploymentModel,
}

impl RetirementModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.regime_general.validate()?;
        self.regime_agirc.validate()?;
        self.unemployment.validate()
    }

    /// Own pensions of `person`, ignoring death
    fn own_pension(&self, person: &Person, year: i32, ctx: &PensionContext) -> Pension {
        let Some(until) = self.unemployment.contributions_end(person) else {
            return Pension::default();
        };
        Pension {
            general: self.regime_general.brut_pension(person, year, until, ctx),
            agirc: self.regime_agirc.brut_pension(person, year, until, ctx),
            reversion: 0.0,
        }
    }

    /// Pensions of `person` during `year`, reversion of deceased adults included
    #[must_use]
    pub fn pension(
        &self,
        family: &Family,
        person: &Person,
        year: i32,
        ctx: &PensionContext,
    ) -> Pension {
        if !person.is_adult() || !person.is_alive(year) {
            return Pension::default();
        }
        let mut pension = self.own_pension(person, year, ctx);
        pension.reversion = family
            .adults()
            .filter(|other| other.name() != person.name() && !other.is_alive(year))
            .map(|deceased| {
                let theirs = self.own_pension(deceased, year, ctx);
                theirs.general * self.regime_general.reversion_rate
                    + theirs.agirc * self.regime_agirc.reversion_rate
            })
            .sum();
        pension
    }

    /// Pensions of the adults alive at the end of `year`, taxed as pensions
    #[must_use]
    pub fn pensions(
        &self,
        family: &Family,
        year: i32,
        ctx: &PensionContext,
        fiscal: &FiscalModel,
    ) -> Vec<(String, Revenue)> {
        family
            .adults()
            .filter(|p| p.is_alive(year))
            .map(|p| {
                let brut = self.pension(family, p, year, ctx).brut();
                (p.name().to_string(), fiscal.pension_taxes.revenue(brut))
            })
            .collect()
    }

    /// Unemployment allowance and layoff compensation of the adults alive
    /// at the end of `year`
    #[must_use]
    pub fn unemployment_revenues(
        &self,
        family: &Family,
        year: i32,
        fiscal: &FiscalModel,
    ) -> Vec<(String, Revenue)> {
        family
            .adults()
            .filter(|p| p.is_alive(year))
            .map(|p| {
                let revenue = self.unemployment.allocation(p, year, fiscal)
                    + self.unemployment.compensation(p, year);
                (p.name().to_string(), revenue)
            })
            .collect()
    }
}
