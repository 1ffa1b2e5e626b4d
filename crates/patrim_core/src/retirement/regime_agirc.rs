//! Complementary pension (AGIRC-ARRCO points)

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::PensionContext;
use crate::date_math;
use crate::error::ConfigError;
use crate::person::Person;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeAgirc {
    pub point_value: f64,
    pub reversion_rate: f64,
    /// Age from which the pension is paid without reduction
    pub age_without_reduction: i32,
    pub reduction_per_quarter: f64,
    pub max_reduction: f64,
}

impl Default for RegimeAgirc {
    fn default() -> Self {
        Self {
            point_value: 1.2841,
            reversion_rate: 0.60,
            age_without_reduction: 67,
            reduction_per_quarter: 0.0125,
            max_reduction: 0.22,
        }
    }
}

impl RegimeAgirc {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.point_value <= 0.0 {
            return Err(ConfigError::invalid(
                "regime_agirc.point_value",
                "must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.reversion_rate) || !(0.0..=1.0).contains(&self.max_reduction)
        {
            return Err(ConfigError::invalid(
                "regime_agirc",
                "rates must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Points acquired when contributions stop on `until`
    #[must_use]
    pub fn nb_points(person: &Person, until: Date) -> f64 {
        let Some(adult) = person.adult() else {
            return 0.0;
        };
        let situation = adult.last_known_agirc_situation;
        let years_after = f64::from(i32::from(until.year()) - situation.at_end_of - 1)
            + date_math::fraction_of_year_before(until);
        situation.nb_points + situation.points_per_year * years_after.max(0.0)
    }

    /// Coefficient applied when liquidating before the age without reduction
    #[must_use]
    pub fn coefficient(&self, person: &Person) -> f64 {
        let Some(adult) = person.adult() else {
            return 0.0;
        };
        let age = adult.age_of_agirc_pension_liquidation;
        let early_quarters = (self.age_without_reduction * 4 - (age.years * 4 + age.months / 3)).max(0);
        1.0 - (self.reduction_per_quarter * f64::from(early_quarters)).min(self.max_reduction)
    }

    #[must_use]
    pub fn yearly_pension(&self, person: &Person, until: Date) -> f64 {
        Self::nb_points(person, until) * self.point_value * self.coefficient(person)
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
        let liquidation = adult.agirc_liquidation_date(person.core.birth_date);
        ctx.paid_share(year, liquidation) * self.yearly_pension(person, until)
    }
}
