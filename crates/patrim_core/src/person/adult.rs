use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;
use crate::fiscal::{FiscalModel, Revenue};
use crate::ownership::InheritanceFiscalOption;

/// Yearly professional income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkIncome {
    Salary {
        brut_salary: f64,
        /// Salary declared before the professional expenses deduction
        taxable_salary: f64,
        net_salary: f64,
        /// Complementary health insurance paid out of the net salary
        #[serde(default)]
        health_insurance: f64,
    },
    /// Self-employed (BNC) turnover
    Turnover {
        turnover: f64,
        #[serde(default)]
        income_lost_insurance: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CauseOfRetirement {
    #[default]
    Planned,
    Demission,
    Layoff,
    RuptureConventionnelle,
}

impl CauseOfRetirement {
    /// Involuntary loss of employment, opening unemployment rights
    #[must_use]
    pub fn opens_unemployment_rights(self) -> bool {
        matches!(
            self,
            CauseOfRetirement::Layoff | CauseOfRetirement::RuptureConventionnelle
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeComponents {
    pub years: i32,
    #[serde(default)]
    pub months: i32,
}

/// Last known state of the general pension regime account
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeGeneralSituation {
    pub at_end_of: i32,
    /// Average yearly salary of the best years
    pub sam: f64,
    pub nb_quarters: i32,
}

/// Last known state of the AGIRC-ARRCO points account
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgircSituation {
    pub at_end_of: i32,
    pub nb_points: f64,
    pub points_per_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adult {
    pub work_income: Option<WorkIncome>,
    pub date_of_retirement: Date,
    #[serde(default)]
    pub cause_of_retirement: CauseOfRetirement,
    /// Start of the current employment, for layoff compensation seniority
    #[serde(default)]
    pub date_of_employment: Option<Date>,
    /// Negotiated compensation replacing the legal one when higher
    #[serde(default)]
    pub layoff_compensation_bonified: Option<f64>,
    #[serde(default)]
    pub has_unemployment_allocation: bool,
    pub age_of_pension_liquidation: AgeComponents,
    pub age_of_agirc_pension_liquidation: AgeComponents,
    pub last_known_pension_situation: RegimeGeneralSituation,
    pub last_known_agirc_situation: AgircSituation,
    #[serde(default)]
    pub nb_of_years_of_dependency: i32,
    #[serde(default)]
    pub fiscal_option: InheritanceFiscalOption,
}

impl Adult {
    #[must_use]
    pub fn retirement_year(&self) -> i32 {
        i32::from(self.date_of_retirement.year())
    }

    #[must_use]
    pub fn pension_liquidation_date(&self, birth_date: Date) -> Date {
        date_math::add_years_months(
            birth_date,
            self.age_of_pension_liquidation.years,
            self.age_of_pension_liquidation.months,
        )
    }

    #[must_use]
    pub fn agirc_liquidation_date(&self, birth_date: Date) -> Date {
        date_math::add_years_months(
            birth_date,
            self.age_of_agirc_pension_liquidation.years,
            self.age_of_agirc_pension_liquidation.months,
        )
    }

    /// Share of `year` before retirement
    #[must_use]
    pub fn active_fraction(&self, year: i32) -> f64 {
        match year.cmp(&self.retirement_year()) {
            std::cmp::Ordering::Less => 1.0,
            std::cmp::Ordering::Equal => date_math::fraction_of_year_before(self.date_of_retirement),
            std::cmp::Ordering::Greater => 0.0,
        }
    }

    /// Full-year work income, net of social charges
    #[must_use]
    pub fn yearly_work_income(&self, fiscal: &FiscalModel) -> Revenue {
        match &self.work_income {
            None => Revenue::default(),
            Some(WorkIncome::Salary {
                brut_salary,
                taxable_salary,
                net_salary,
                health_insurance,
            }) => Revenue {
                brut: *brut_salary,
                net: net_salary - health_insurance,
                taxable: fiscal.income_taxes.taxable_salary(*taxable_salary),
            },
            Some(WorkIncome::Turnover {
                turnover,
                income_lost_insurance,
            }) => Revenue {
                brut: *turnover,
                net: fiscal.turnover_taxes.net(*turnover) - income_lost_insurance,
                taxable: fiscal.turnover_taxes.taxable(*turnover),
            },
        }
    }

    /// Yearly brut salary, the base of unemployment and layoff rights
    #[must_use]
    pub fn brut_salary(&self) -> Option<f64> {
        match &self.work_income {
            Some(WorkIncome::Salary { brut_salary, .. }) => Some(*brut_salary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdultBuilder;
    use crate::person::Sex;
    use jiff::civil::date;

    #[test]
    fn test_liquidation_dates() {
        let person = AdultBuilder::new("Lionel", Sex::Male, date(1965, 4, 15))
            .pension_liquidation(62, 9)
            .agirc_liquidation(64, 0)
            .build();
        let adult = person.adult().unwrap();
        assert_eq!(
            adult.pension_liquidation_date(person.core.birth_date),
            date(2028, 1, 15)
        );
        assert_eq!(
            adult.agirc_liquidation_date(person.core.birth_date),
            date(2029, 4, 15)
        );
    }

    #[test]
    fn test_salary_income() {
        let fiscal = FiscalModel::default();
        let person = AdultBuilder::new("Lionel", Sex::Male, date(1965, 4, 15))
            .salary(60_000.0, 50_000.0, 47_000.0, 1_000.0)
            .build();
        let income = person.adult().unwrap().yearly_work_income(&fiscal);
        assert_eq!(income.brut, 60_000.0);
        assert_eq!(income.net, 46_000.0);
        assert_eq!(income.taxable, 45_000.0);
    }

    #[test]
    fn test_turnover_income() {
        let fiscal = FiscalModel::default();
        let person = AdultBuilder::new("Vanessa", Sex::Female, date(1968, 3, 10))
            .turnover(100_000.0, 2_000.0)
            .build();
        let income = person.adult().unwrap().yearly_work_income(&fiscal);
        assert!((income.net - 75_900.0).abs() < 1e-6);
        assert!((income.taxable - 66_000.0).abs() < 1e-6);
        assert_eq!(person.adult().unwrap().brut_salary(), None);
    }
}
