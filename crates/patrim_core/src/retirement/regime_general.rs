//! Basic pension of the general regime (CNAV)
//!
//! pension = min(SAM, PASS) × rate × min(1, quarters / quarters required)
//!
//! The full rate is reduced for each missing quarter, counted either against
//! the quarters required or against the full-rate age, whichever is lower.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::PensionContext;
use crate::date_math;
use crate::error::ConfigError;
use crate::person::{AgeComponents, Person};

/// Quarters required for people born from `from_birth_year`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartersRequiredEntry {
    pub from_birth_year: i32,
    pub quarters: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeGeneral {
    pub max_rate: f64,
    pub discount_per_quarter: f64,
    pub max_discount_quarters: u32,
    pub age_of_full_rate: i32,
    /// Plafond annuel de la sécurité sociale
    pub pass: f64,
    /// Share of the pension paid to the surviving spouse
    pub reversion_rate: f64,
    pub quarters_required: Vec<QuartersRequiredEntry>,
}

impl Default for RegimeGeneral {
    fn default() -> Self {
        let entry = |from_birth_year, quarters| QuartersRequiredEntry {
            from_birth_year,
            quarters,
        };
        Self {
            max_rate: 0.5,
            discount_per_quarter: 0.00625,
            max_discount_quarters: 20,
            age_of_full_rate: 67,
            pass: 41_136.0,
            reversion_rate: 0.54,
            quarters_required: vec![
                entry(1955, 166),
                entry(1958, 167),
                entry(1961, 168),
                entry(1964, 169),
                entry(1967, 170),
                entry(1970, 171),
                entry(1973, 172),
            ],
        }
    }
}

impl RegimeGeneral {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.max_rate) {
            return Err(ConfigError::invalid(
                "regime_general.max_rate",
                "must be within [0, 1]",
            ));
        }
        if self.discount_per_quarter < 0.0 || self.pass <= 0.0 {
            return Err(ConfigError::invalid(
                "regime_general",
                "discount must be non-negative and PASS positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.reversion_rate) {
            return Err(ConfigError::invalid(
                "regime_general.reversion_rate",
                "must be within [0, 1]",
            ));
        }
        if self.quarters_required.is_empty()
            || self
                .quarters_required
                .windows(2)
                .any(|w| w[1].from_birth_year <= w[0].from_birth_year)
        {
            return Err(ConfigError::invalid(
                "regime_general.quarters_required",
                "must be a non-empty table sorted by birth year",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn required_quarters(&self, birth_year: i32, additional: u32) -> u32 {
        let base = self
            .quarters_required
            .iter()
            .rev()
            .find(|e| e.from_birth_year <= birth_year)
            .or(self.quarters_required.first())
            .map_or(0, |e| e.quarters);
        base + additional
    }

    /// Quarters validated when contributions stop on `until`
    #[must_use]
    pub fn nb_quarters(person: &Person, until: Date) -> u32 {
        let Some(adult) = person.adult() else {
            return 0;
        };
        let situation = adult.last_known_pension_situation;
        let years_after =
            f64::from(i32::from(until.year()) - situation.at_end_of - 1)
                + date_math::fraction_of_year_before(until);
        let earned = (4.0 * years_after).floor().max(0.0);
        // whole number of quarters
        situation.nb_quarters.max(0) as u32 + earned as u32
    }

    /// Rate after the discount for missing quarters
    #[must_use]
    pub fn rate(&self, quarters: u32, required: u32, liquidation_age: AgeComponents) -> f64 {
        let age_quarters = liquidation_age.years * 4 + liquidation_age.months / 3;
        let missing_by_age = (self.age_of_full_rate * 4 - age_quarters).max(0);
        let missing_by_quarters = i32::try_from(required.saturating_sub(quarters)).unwrap_or(i32::MAX);
        let missing = missing_by_age
            .min(missing_by_quarters)
            .min(i32::try_from(self.max_discount_quarters).unwrap_or(i32::MAX));
        self.max_rate - self.discount_per_quarter * f64::from(missing)
    }

    /// Full-year pension before devaluation
    #[must_use]
    pub fn yearly_pension(&self, person: &Person, until: Date, additional_quarters: u32) -> f64 {
        let Some(adult) = person.adult() else {
            return 0.0;
        };
        let quarters = Self::nb_quarters(person, until);
        let required = self.required_quarters(person.birth_year(), additional_quarters);
        if required == 0 {
            return 0.0;
        }
        let rate = self.rate(quarters, required, adult.age_of_pension_liquidation);
        let prorata = (f64::from(quarters) / f64::from(required)).min(1.0);
        adult.last_known_pension_situation.sam.min(self.pass) * rate * prorata
    }

    /// Brut pension received during `year`, whether or not the person is alive
    #[must_use]
    pub fn brut_pension(
        &self,
        person: &Person,
        year: i32,
        until: Date,
        ctx: &PensionContext,
    ) -> f64 {
        let Some(adult) = person.adult() else {
            return 0.0;
        };
        let liquidation = adult.pension_liquidation_date(person.core.birth_date);
        ctx.paid_share(year, liquidation)
            * self.yearly_pension(person, until, ctx.additional_quarters)
    }
}
