use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::LifeEvent;
use super::adult::Adult;
use super::child::Child;
use crate::clock::Clock;
use crate::date_math;
use crate::fiscal::{FiscalModel, Revenue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Fields shared by adults and children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCore {
    pub name: String,
    pub sex: Sex,
    pub birth_date: Date,
    /// Resampled at the start of every run for adults
    pub age_of_death: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PersonKind {
    Adult(Adult),
    Child(Child),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub core: PersonCore,
    pub kind: PersonKind,
}

impl Person {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    #[must_use]
    pub fn sex(&self) -> Sex {
        self.core.sex
    }

    #[must_use]
    pub fn birth_year(&self) -> i32 {
        i32::from(self.core.birth_date.year())
    }

    /// Age reached during `year`
    #[must_use]
    pub fn age(&self, year: i32) -> i32 {
        (year - self.birth_year()).max(0)
    }

    #[must_use]
    pub fn age_today(&self, clock: &impl Clock) -> i32 {
        date_math::whole_years_between(self.core.birth_date, clock.today()).max(0)
    }

    #[must_use]
    pub fn year_of_death(&self) -> i32 {
        self.birth_year() + self.core.age_of_death
    }

    #[must_use]
    pub fn is_alive(&self, at_end_of: i32) -> bool {
        at_end_of < self.year_of_death()
    }

    /// Died during `year`
    #[must_use]
    pub fn is_deceased(&self, year: i32) -> bool {
        self.is_alive(year - 1) && !self.is_alive(year)
    }

    #[must_use]
    pub fn is_adult(&self) -> bool {
        matches!(self.kind, PersonKind::Adult(_))
    }

    #[must_use]
    pub fn is_child(&self) -> bool {
        matches!(self.kind, PersonKind::Child(_))
    }

    #[must_use]
    pub fn adult(&self) -> Option<&Adult> {
        match &self.kind {
            PersonKind::Adult(adult) => Some(adult),
            PersonKind::Child(_) => None,
        }
    }

    pub fn adult_mut(&mut self) -> Option<&mut Adult> {
        match &mut self.kind {
            PersonKind::Adult(adult) => Some(adult),
            PersonKind::Child(_) => None,
        }
    }

    #[must_use]
    pub fn child(&self) -> Option<&Child> {
        match &self.kind {
            PersonKind::Child(child) => Some(child),
            PersonKind::Adult(_) => None,
        }
    }

    /// Year of a life event, `None` if it does not apply to this person
    #[must_use]
    pub fn year_of_event(&self, event: LifeEvent) -> Option<i32> {
        match (event, &self.kind) {
            (LifeEvent::Death, _) => Some(self.year_of_death()),
            (LifeEvent::Retirement, PersonKind::Adult(adult)) => Some(adult.retirement_year()),
            (LifeEvent::PensionLiquidation, PersonKind::Adult(adult)) => Some(i32::from(
                adult
                    .pension_liquidation_date(self.core.birth_date)
                    .year(),
            )),
            (LifeEvent::Dependency, PersonKind::Adult(adult)) => {
                Some(self.year_of_death() - adult.nb_of_years_of_dependency)
            }
            (LifeEvent::UniversityStart, PersonKind::Child(child)) => {
                Some(self.birth_year() + child.age_of_university)
            }
            (LifeEvent::Independence, PersonKind::Child(child)) => {
                Some(self.birth_year() + child.age_of_independence)
            }
            _ => None,
        }
    }

    /// Share of `year` spent working (0 once dead or for children)
    #[must_use]
    pub fn is_active(&self, year: i32) -> f64 {
        match &self.kind {
            PersonKind::Adult(adult) if self.is_alive(year) => adult.active_fraction(year),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn is_retired(&self, year: i32) -> bool {
        self.adult()
            .is_some_and(|adult| adult.retirement_year() <= year)
    }

    /// Dependent during the last years of life
    #[must_use]
    pub fn is_dependent(&self, year: i32) -> bool {
        self.is_alive(year)
            && self
                .year_of_event(LifeEvent::Dependency)
                .is_some_and(|from| from <= year)
    }

    #[must_use]
    pub fn is_fiscally_dependent(&self, year: i32) -> bool {
        match &self.kind {
            PersonKind::Child(child) => {
                self.is_alive(year) && year < self.birth_year() + child.age_of_independence
            }
            PersonKind::Adult(_) => false,
        }
    }

    /// Work income received during `year`
    #[must_use]
    pub fn work_income(&self, year: i32, fiscal: &FiscalModel) -> Revenue {
        match &self.kind {
            PersonKind::Adult(adult) => {
                let fraction = self.is_active(year);
                if fraction <= 0.0 {
                    return Revenue::default();
                }
                adult.yearly_work_income(fiscal).scaled(fraction)
            }
            PersonKind::Child(_) => Revenue::default(),
        }
    }
}
