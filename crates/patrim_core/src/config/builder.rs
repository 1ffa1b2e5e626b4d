//! Family member builders
//!
//! Fluent constructors for adults and children with sensible defaults, used
//! to write scenarios in code and in tests.
//!
//! ```ignore
//! use patrim_core::config::{AdultBuilder, ChildBuilder};
//! use patrim_core::person::{CauseOfRetirement, Sex};
//! use jiff::civil::date;
//!
//! let lionel = AdultBuilder::new("Lionel", Sex::Male, date(1965, 4, 15))
//!     .salary(60_000.0, 50_000.0, 47_000.0, 1_000.0)
//!     .retirement(date(2027, 4, 15), CauseOfRetirement::Planned)
//!     .pension_liquidation(64, 0)
//!     .pension_situation(2024, 40_000.0, 130)
//!     .build();
//! let arthur = ChildBuilder::new("Arthur", Sex::Male, date(2010, 9, 1)).build();
//! ```

use jiff::civil::Date;

use crate::date_math;
use crate::ownership::InheritanceFiscalOption;
use crate::person::{
    AgeComponents, AgircSituation, Adult, CauseOfRetirement, Child, Person, PersonCore, PersonKind,
    RegimeGeneralSituation, Sex, WorkIncome,
};

const DEFAULT_ADULT_AGE_OF_DEATH: i32 = 85;
const DEFAULT_CHILD_AGE_OF_DEATH: i32 = 90;
const DEFAULT_RETIREMENT_AGE: i32 = 64;
const DEFAULT_SITUATION_YEAR: i32 = 2024;

/// Builder for an adult of the household
#[derive(Debug, Clone)]
pub struct AdultBuilder {
    core: PersonCore,
    adult: Adult,
}

impl AdultBuilder {
    /// Adult retiring at 64 with no income and empty pension accounts
    #[must_use]
    pub fn new(name: impl Into<String>, sex: Sex, birth_date: Date) -> Self {
        let at_64 = AgeComponents {
            years: DEFAULT_RETIREMENT_AGE,
            months: 0,
        };
        Self {
            core: PersonCore {
                name: name.into(),
                sex,
                birth_date,
                age_of_death: DEFAULT_ADULT_AGE_OF_DEATH,
            },
            adult: Adult {
                work_income: None,
                date_of_retirement: date_math::add_years_months(
                    birth_date,
                    DEFAULT_RETIREMENT_AGE,
                    0,
                ),
                cause_of_retirement: CauseOfRetirement::Planned,
                date_of_employment: None,
                layoff_compensation_bonified: None,
                has_unemployment_allocation: false,
                age_of_pension_liquidation: at_64,
                age_of_agirc_pension_liquidation: at_64,
                last_known_pension_situation: RegimeGeneralSituation {
                    at_end_of: DEFAULT_SITUATION_YEAR,
                    sam: 0.0,
                    nb_quarters: 0,
                },
                last_known_agirc_situation: AgircSituation {
                    at_end_of: DEFAULT_SITUATION_YEAR,
                    nb_points: 0.0,
                    points_per_year: 0.0,
                },
                nb_of_years_of_dependency: 0,
                fiscal_option: InheritanceFiscalOption::default(),
            },
        }
    }

    #[must_use]
    pub fn age_of_death(mut self, age: i32) -> Self {
        self.core.age_of_death = age;
        self
    }

    #[must_use]
    pub fn dependency_years(mut self, years: i32) -> Self {
        self.adult.nb_of_years_of_dependency = years;
        self
    }

    // =========================================================================
    // Work
    // =========================================================================

    #[must_use]
    pub fn salary(mut self, brut: f64, taxable: f64, net: f64, health_insurance: f64) -> Self {
        self.adult.work_income = Some(WorkIncome::Salary {
            brut_salary: brut,
            taxable_salary: taxable,
            net_salary: net,
            health_insurance,
        });
        self
    }

    #[must_use]
    pub fn turnover(mut self, turnover: f64, income_lost_insurance: f64) -> Self {
        self.adult.work_income = Some(WorkIncome::Turnover {
            turnover,
            income_lost_insurance,
        });
        self
    }

    #[must_use]
    pub fn retirement(mut self, date: Date, cause: CauseOfRetirement) -> Self {
        self.adult.date_of_retirement = date;
        self.adult.cause_of_retirement = cause;
        self
    }

    #[must_use]
    pub fn employed_since(mut self, date: Date) -> Self {
        self.adult.date_of_employment = Some(date);
        self
    }

    #[must_use]
    pub fn bonified_compensation(mut self, amount: f64) -> Self {
        self.adult.layoff_compensation_bonified = Some(amount);
        self
    }

    #[must_use]
    pub fn unemployment_allocation(mut self, has_allocation: bool) -> Self {
        self.adult.has_unemployment_allocation = has_allocation;
        self
    }

    // =========================================================================
    // Pensions
    // =========================================================================

    #[must_use]
    pub fn pension_liquidation(mut self, years: i32, months: i32) -> Self {
        self.adult.age_of_pension_liquidation = AgeComponents { years, months };
        self
    }

    #[must_use]
    pub fn agirc_liquidation(mut self, years: i32, months: i32) -> Self {
        self.adult.age_of_agirc_pension_liquidation = AgeComponents { years, months };
        self
    }

    #[must_use]
    pub fn pension_situation(mut self, at_end_of: i32, sam: f64, nb_quarters: i32) -> Self {
        self.adult.last_known_pension_situation = RegimeGeneralSituation {
            at_end_of,
            sam,
            nb_quarters,
        };
        self
    }

    #[must_use]
    pub fn agirc_situation(mut self, at_end_of: i32, nb_points: f64, points_per_year: f64) -> Self {
        self.adult.last_known_agirc_situation = AgircSituation {
            at_end_of,
            nb_points,
            points_per_year,
        };
        self
    }

    /// Option chosen as surviving spouse
    #[must_use]
    pub fn fiscal_option(mut self, option: InheritanceFiscalOption) -> Self {
        self.adult.fiscal_option = option;
        self
    }

    #[must_use]
    pub fn build(self) -> Person {
        Person {
            core: self.core,
            kind: PersonKind::Adult(self.adult),
        }
    }
}

/// Builder for a child of the household
#[derive(Debug, Clone)]
pub struct ChildBuilder {
    core: PersonCore,
    child: Child,
}

impl ChildBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, sex: Sex, birth_date: Date) -> Self {
        Self {
            core: PersonCore {
                name: name.into(),
                sex,
                birth_date,
                age_of_death: DEFAULT_CHILD_AGE_OF_DEATH,
            },
            child: Child::default(),
        }
    }

    #[must_use]
    pub fn age_of_death(mut self, age: i32) -> Self {
        self.core.age_of_death = age;
        self
    }

    #[must_use]
    pub fn age_of_university(mut self, age: i32) -> Self {
        self.child.age_of_university = age;
        self
    }

    #[must_use]
    pub fn age_of_independence(mut self, age: i32) -> Self {
        self.child.age_of_independence = age;
        self
    }

    #[must_use]
    pub fn build(self) -> Person {
        Person {
            core: self.core,
            kind: PersonKind::Child(self.child),
        }
    }
}
