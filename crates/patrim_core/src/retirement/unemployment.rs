//! Unemployment allowance (ARE) and legal layoff compensation

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;
use crate::error::ConfigError;
use crate::fiscal::{FiscalModel, Revenue};
use crate::person::Person;

/// Allowance duration for people laid off from `from_age`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationEntry {
    pub from_age: i32,
    pub months: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnemploymentModel {
    pub durations: Vec<DurationEntry>,
    /// Daily allowance: max(a × SJR + fixed, b × SJR), capped at c × SJR
    pub proportional_rate: f64,
    pub fixed_daily_allowance: f64,
    pub alternative_rate: f64,
    pub max_rate: f64,
    /// Months of salary per year of seniority, up to `seniority_threshold` years
    pub compensation_rate_before_threshold: f64,
    pub compensation_rate_after_threshold: f64,
    pub seniority_threshold: i32,
}

impl Default for UnemploymentModel {
    fn default() -> Self {
        Self {
            durations: vec![
                DurationEntry {
                    from_age: 0,
                    months: 24,
                },
                DurationEntry {
                    from_age: 53,
                    months: 30,
                },
                DurationEntry {
                    from_age: 55,
                    months: 36,
                },
            ],
            proportional_rate: 0.404,
            fixed_daily_allowance: 12.12,
            alternative_rate: 0.57,
            max_rate: 0.75,
            compensation_rate_before_threshold: 0.25,
            compensation_rate_after_threshold: 1.0 / 3.0,
            seniority_threshold: 10,
        }
    }
}

impl UnemploymentModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.durations.is_empty()
            || self
                .durations
                .windows(2)
                .any(|w| w[1].from_age <= w[0].from_age)
        {
            return Err(ConfigError::invalid(
                "unemployment.durations",
                "must be a non-empty table sorted by age",
            ));
        }
        if self.max_rate < 0.0 || self.proportional_rate < 0.0 || self.alternative_rate < 0.0 {
            return Err(ConfigError::invalid(
                "unemployment",
                "rates must be non-negative",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_eligible(person: &Person) -> bool {
        person.adult().is_some_and(|adult| {
            adult.has_unemployment_allocation
                && adult.cause_of_retirement.opens_unemployment_rights()
                && adult.brut_salary().is_some()
        })
    }

    #[must_use]
    pub fn duration_in_months(&self, age_at_layoff: i32) -> i32 {
        self.durations
            .iter()
            .rev()
            .find(|e| e.from_age <= age_at_layoff)
            .map_or(0, |e| e.months)
    }

    /// Allowance period, ending at the latest with the pension liquidation
    #[must_use]
    pub fn allocation_period(&self, person: &Person) -> Option<(Date, Date)> {
        if !Self::is_eligible(person) {
            return None;
        }
        let adult = person.adult()?;
        let start = adult.date_of_retirement;
        let age = date_math::whole_years_between(person.core.birth_date, start);
        let end = date_math::add_years_months(start, 0, self.duration_in_months(age))
            .min(adult.pension_liquidation_date(person.core.birth_date));
        (start < end).then_some((start, end))
    }

    /// End of pension contributions: retirement, or end of the allowance
    #[must_use]
    pub fn contributions_end(&self, person: &Person) -> Option<Date> {
        let adult = person.adult()?;
        Some(
            self.allocation_period(person)
                .map_or(adult.date_of_retirement, |(_, end)| end),
        )
    }

    /// Daily allowance from the yearly brut salary
    #[must_use]
    pub fn daily_allowance(&self, yearly_brut_salary: f64) -> f64 {
        let sjr = yearly_brut_salary / 365.0;
        (self.proportional_rate * sjr + self.fixed_daily_allowance)
            .max(self.alternative_rate * sjr)
            .min(self.max_rate * sjr)
    }

    /// Allowance received during `year`
    #[must_use]
    pub fn allocation(&self, person: &Person, year: i32, fiscal: &FiscalModel) -> Revenue {
        let Some((start, end)) = self.allocation_period(person) else {
            return Revenue::default();
        };
        let Some(salary) = person.adult().and_then(|a| a.brut_salary()) else {
            return Revenue::default();
        };
        let fraction = date_math::fraction_of_year_between(year, start, end);
        if fraction <= 0.0 {
            return Revenue::default();
        }
        let brut = self.daily_allowance(salary) * 365.0 * fraction;
        Revenue {
            brut,
            net: fiscal.unemployment_taxes.net(brut),
            taxable: fiscal
                .income_taxes
                .taxable_salary(fiscal.unemployment_taxes.taxable(brut)),
        }
    }

    /// Legal compensation, or the negotiated one when higher
    #[must_use]
    pub fn layoff_compensation(&self, person: &Person) -> f64 {
        let Some(adult) = person.adult() else {
            return 0.0;
        };
        if !adult.cause_of_retirement.opens_unemployment_rights() {
            return 0.0;
        }
        let legal = match (adult.brut_salary(), adult.date_of_employment) {
            (Some(salary), Some(hired)) => {
                let seniority = date_math::whole_years_between(hired, adult.date_of_retirement).max(0);
                let before = seniority.min(self.seniority_threshold);
                let after = (seniority - self.seniority_threshold).max(0);
                salary / 12.0
                    * (self.compensation_rate_before_threshold * f64::from(before)
                        + self.compensation_rate_after_threshold * f64::from(after))
            }
            _ => 0.0,
        };
        adult.layoff_compensation_bonified.map_or(legal, |b| b.max(legal))
    }

    /// Compensation received during `year`; exempt of income tax
    #[must_use]
    pub fn compensation(&self, person: &Person, year: i32) -> Revenue {
        match person.adult() {
            Some(adult) if adult.retirement_year() == year => {
                let brut = self.layoff_compensation(person);
                Revenue {
                    brut,
                    net: brut,
                    taxable: 0.0,
                }
            }
            _ => Revenue::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdultBuilder;
    use crate::person::{CauseOfRetirement, Sex};
    use jiff::civil::date;

    fn laid_off() -> Person {
        AdultBuilder::new("Lionel", Sex::Male, date(1965, 4, 15))
            .salary(60_000.0, 50_000.0, 45_000.0, 0.0)
            .retirement(date(2022, 1, 1), CauseOfRetirement::Layoff)
            .employed_since(date(2002, 1, 1))
            .unemployment_allocation(true)
            .pension_liquidation(62, 0)
            .build()
    }

    #[test]
    fn test_duration_by_age() {
        let model = UnemploymentModel::default();
        assert_eq!(model.duration_in_months(40), 24);
        assert_eq!(model.duration_in_months(53), 30);
        assert_eq!(model.duration_in_months(56), 36);
    }

    #[test]
    fn test_daily_allowance_formula() {
        let model = UnemploymentModel::default();
        // SJR = 100
        let allowance = model.daily_allowance(36_500.0);
        assert!((allowance - 57.0).abs() < 1e-9);
        // low salary: capped at 75 % of SJR
        let low = model.daily_allowance(7_300.0);
        assert!((low - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_period_ends_at_liquidation() {
        let model = UnemploymentModel::default();
        let (start, end) = model.allocation_period(&laid_off()).unwrap();
        assert_eq!(start, date(2022, 1, 1));
        // 36 months from age 56, before the liquidation on 2027-04-15
        assert_eq!(end, date(2025, 1, 1));
        let fiscal = FiscalModel::default();
        let allowance = model.allocation(&laid_off(), 2023, &fiscal);
        assert!((allowance.brut - model.daily_allowance(60_000.0) * 365.0).abs() < 1e-6);
        assert_eq!(model.allocation(&laid_off(), 2025, &fiscal), Revenue::default());
    }

    #[test]
    fn test_planned_retirement_has_no_rights() {
        let model = UnemploymentModel::default();
        let person = AdultBuilder::new("Vanessa", Sex::Female, date(1968, 3, 10))
            .salary(60_000.0, 50_000.0, 45_000.0, 0.0)
            .unemployment_allocation(true)
            .build();
        assert!(model.allocation_period(&person).is_none());
        assert_eq!(model.layoff_compensation(&person), 0.0);
    }

    #[test]
    fn test_layoff_compensation() {
        let model = UnemploymentModel::default();
        // 20 years: 10 × 1/4 + 10 × 1/3 months of 5 000
        let expected = 5_000.0 * (2.5 + 10.0 / 3.0);
        assert!((model.layoff_compensation(&laid_off()) - expected).abs() < 1e-6);
        assert_eq!(model.compensation(&laid_off(), 2022).brut, model.layoff_compensation(&laid_off()));
        assert_eq!(model.compensation(&laid_off(), 2023), Revenue::default());
    }
}
