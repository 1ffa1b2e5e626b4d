//! Family members and household-level queries

mod adult;
mod child;
mod family;
#[allow(clippy::module_inception)]
mod person;

pub use adult::{
    AgeComponents, AgircSituation, Adult, CauseOfRetirement, RegimeGeneralSituation, WorkIncome,
};
pub use child::Child;
pub use family::Family;
pub use person::{Person, PersonCore, PersonKind, Sex};

use serde::{Deserialize, Serialize};

use crate::error::TimeSpanError;

/// Dated events of a person's life an expense can be tied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeEvent {
    Death,
    Retirement,
    PensionLiquidation,
    Dependency,
    UniversityStart,
    Independence,
}

impl LifeEvent {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LifeEvent::Death => "death",
            LifeEvent::Retirement => "retirement",
            LifeEvent::PensionLiquidation => "pension liquidation",
            LifeEvent::Dependency => "dependency",
            LifeEvent::UniversityStart => "university start",
            LifeEvent::Independence => "independence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupOfPersons {
    AllAdults,
    AllChildren,
    AllPersons,
}

/// Age of a family member at the end of a year
pub trait AgeProvider {
    fn age_of(&self, name: &str, year: i32) -> Option<i32>;
}

/// Resolves life events to calendar years
pub trait LifeEventResolver {
    fn year_of_event(&self, name: &str, event: LifeEvent) -> Result<i32, TimeSpanError>;

    fn names_in_group(&self, group: GroupOfPersons) -> Vec<&str>;
}
