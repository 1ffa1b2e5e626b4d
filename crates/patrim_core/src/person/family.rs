use serde::{Deserialize, Serialize};

use super::{AgeProvider, GroupOfPersons, LifeEvent, LifeEventResolver, Person};
use crate::error::{ConfigError, FiscalError, TimeSpanError};
use crate::fiscal::{FiscalModel, IncomeTax, Revenue};

/// Household members, ordered and unique by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Family {
    members: Vec<Person>,
}

impl Family {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: Vec<Person>) -> Result<Self, ConfigError> {
        let mut family = Self::new();
        for member in members {
            family.add_member(member)?;
        }
        Ok(family)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, member) in self.members.iter().enumerate() {
            if self.members[..i].iter().any(|m| m.name() == member.name()) {
                return Err(ConfigError::DuplicatePerson(member.name().to_string()));
            }
            if member.core.age_of_death < 0 {
                return Err(ConfigError::invalid(
                    format!("{}.age_of_death", member.name()),
                    "must be non-negative",
                ));
            }
        }
        Ok(())
    }

    pub fn add_member(&mut self, person: Person) -> Result<(), ConfigError> {
        if self.member(person.name()).is_some() {
            return Err(ConfigError::DuplicatePerson(person.name().to_string()));
        }
        self.members.push(person);
        Ok(())
    }

    pub fn remove_member(&mut self, name: &str) -> Option<Person> {
        let index = self.members.iter().position(|m| m.name() == name)?;
        Some(self.members.remove(index))
    }

    /// Replace the member with the same name
    pub fn update_member(&mut self, person: Person) -> Result<(), ConfigError> {
        match self.members.iter_mut().find(|m| m.name() == person.name()) {
            Some(member) => {
                *member = person;
                Ok(())
            }
            None => Err(ConfigError::UnknownPerson {
                context: "family update".to_string(),
                name: person.name().to_string(),
            }),
        }
    }

    #[must_use]
    pub fn members(&self) -> &[Person] {
        &self.members
    }

    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.members.iter_mut()
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Person> {
        self.members.iter().find(|m| m.name() == name)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut Person> {
        self.members.iter_mut().find(|m| m.name() == name)
    }

    pub fn adults(&self) -> impl Iterator<Item = &Person> {
        self.members.iter().filter(|m| m.is_adult())
    }

    pub fn children(&self) -> impl Iterator<Item = &Person> {
        self.members.iter().filter(|m| m.is_child())
    }

    #[must_use]
    pub fn adult_names(&self) -> Vec<String> {
        self.adults().map(|m| m.name().to_string()).collect()
    }

    #[must_use]
    pub fn children_names(&self) -> Vec<String> {
        self.children().map(|m| m.name().to_string()).collect()
    }

    #[must_use]
    pub fn nb_of_adults_alive(&self, year: i32) -> usize {
        self.adults().filter(|m| m.is_alive(year)).count()
    }

    #[must_use]
    pub fn nb_of_children_alive(&self, year: i32) -> usize {
        self.children().filter(|m| m.is_alive(year)).count()
    }

    #[must_use]
    pub fn nb_of_fiscal_children(&self, year: i32) -> usize {
        self.children()
            .filter(|m| m.is_fiscally_dependent(year))
            .count()
    }

    #[must_use]
    pub fn nb_of_members_alive(&self, year: i32) -> usize {
        self.members.iter().filter(|m| m.is_alive(year)).count()
    }

    /// Members counted by expenses proportional to the household size
    #[must_use]
    pub fn nb_of_expense_members(&self, year: i32) -> usize {
        self.nb_of_adults_alive(year) + self.nb_of_fiscal_children(year)
    }

    /// The other adult of the household, if still alive at the end of `year`
    #[must_use]
    pub fn spouse_of(&self, name: &str, year: i32) -> Option<&Person> {
        self.adults()
            .find(|m| m.name() != name && m.is_alive(year))
    }

    pub fn family_quotient(&self, year: i32, fiscal: &FiscalModel) -> Result<f64, FiscalError> {
        fiscal.income_taxes.family_quotient(
            self.nb_of_adults_alive(year),
            self.nb_of_fiscal_children(year),
        )
    }

    /// Work incomes of the adults alive at the end of `year`, per member
    #[must_use]
    pub fn work_incomes(&self, year: i32, fiscal: &FiscalModel) -> Vec<(String, Revenue)> {
        self.adults()
            .filter(|m| m.is_alive(year))
            .map(|m| (m.name().to_string(), m.work_income(year, fiscal)))
            .collect()
    }

    /// Household income tax; no tax once every adult is gone
    pub fn irpp(
        &self,
        year: i32,
        taxable_income: f64,
        fiscal: &FiscalModel,
    ) -> Result<Option<IncomeTax>, FiscalError> {
        let nb_adults = self.nb_of_adults_alive(year);
        if nb_adults == 0 {
            return Ok(None);
        }
        fiscal
            .income_taxes
            .irpp(taxable_income, nb_adults, self.nb_of_fiscal_children(year))
            .map(Some)
    }
}

impl AgeProvider for Family {
    fn age_of(&self, name: &str, year: i32) -> Option<i32> {
        self.member(name).map(|m| m.age(year))
    }
}

impl LifeEventResolver for Family {
    fn year_of_event(&self, name: &str, event: LifeEvent) -> Result<i32, TimeSpanError> {
        let member = self
            .member(name)
            .ok_or_else(|| TimeSpanError::UnknownPerson(name.to_string()))?;
        member
            .year_of_event(event)
            .ok_or_else(|| TimeSpanError::UnresolvedEvent {
                event: event.label(),
                name: name.to_string(),
            })
    }

    fn names_in_group(&self, group: GroupOfPersons) -> Vec<&str> {
        self.members
            .iter()
            .filter(|m| match group {
                GroupOfPersons::AllAdults => m.is_adult(),
                GroupOfPersons::AllChildren => m.is_child(),
                GroupOfPersons::AllPersons => true,
            })
            .map(Person::name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdultBuilder, ChildBuilder};
    use crate::person::Sex;
    use jiff::civil::date;

    fn family() -> Family {
        Family::from_members(vec![
            AdultBuilder::new("Lionel", Sex::Male, date(1965, 4, 15))
                .age_of_death(81)
                .build(),
            AdultBuilder::new("Vanessa", Sex::Female, date(1968, 3, 10))
                .age_of_death(90)
                .build(),
            ChildBuilder::new("Arthur", Sex::Male, date(2010, 9, 1)).build(),
            ChildBuilder::new("Lou-Ann", Sex::Female, date(2014, 1, 20)).build(),
        ])
        .unwrap()
    }

    #[test]
    fn test_unique_names() {
        let mut f = family();
        let duplicate = ChildBuilder::new("Arthur", Sex::Male, date(2012, 1, 1)).build();
        assert_eq!(
            f.add_member(duplicate),
            Err(ConfigError::DuplicatePerson("Arthur".to_string()))
        );
        assert!(f.remove_member("Arthur").is_some());
        assert!(f.remove_member("Arthur").is_none());
        assert_eq!(f.children_names(), vec!["Lou-Ann".to_string()]);
    }

    #[test]
    fn test_counts() {
        let f = family();
        assert_eq!(f.nb_of_adults_alive(2025), 2);
        assert_eq!(f.nb_of_fiscal_children(2025), 2);
        assert_eq!(f.nb_of_expense_members(2025), 4);
        // Arthur leaves the household in 2034
        assert_eq!(f.nb_of_fiscal_children(2034), 1);
        assert_eq!(f.nb_of_adults_alive(2046), 1);
        assert_eq!(f.nb_of_members_alive(2050), 3);
    }

    #[test]
    fn test_spouse_of() {
        let f = family();
        assert_eq!(f.spouse_of("Lionel", 2046).map(Person::name), Some("Vanessa"));
        assert_eq!(f.spouse_of("Vanessa", 2046), None);
    }

    #[test]
    fn test_family_quotient_and_irpp() {
        let f = family();
        let fiscal = FiscalModel::default();
        assert_eq!(f.family_quotient(2025, &fiscal).unwrap(), 3.0);
        let tax = f.irpp(2025, 60_000.0, &fiscal).unwrap().unwrap();
        assert_eq!(tax.family_quotient, 3.0);
        assert!(f.irpp(2070, 10_000.0, &fiscal).unwrap().is_none());
    }

    #[test]
    fn test_event_resolution() {
        let f = family();
        assert_eq!(f.year_of_event("Lionel", LifeEvent::Death), Ok(2046));
        assert_eq!(
            f.year_of_event("Arthur", LifeEvent::Retirement),
            Err(TimeSpanError::UnresolvedEvent {
                event: "retirement",
                name: "Arthur".to_string()
            })
        );
        assert_eq!(
            f.year_of_event("Bob", LifeEvent::Death),
            Err(TimeSpanError::UnknownPerson("Bob".to_string()))
        );
        assert_eq!(f.names_in_group(GroupOfPersons::AllAdults), vec!["Lionel", "Vanessa"]);
        assert_eq!(f.age_of("Arthur", 2025), Some(15));
    }
}
