use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::person::{Family, Person, Sex};
use crate::random::{RandomGenerator, Randomizer};

/// Youngest age at which dependency may start
pub const MIN_AGE_OF_DEPENDENCY: i32 = 65;

/// Values drawn for one adult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdultRandomProperties {
    pub age_of_death: i32,
    pub nb_of_years_of_dependency: i32,
}

/// Adult name to its drawn properties
pub type DictionaryOfAdultRandomProperties = BTreeMap<String, AdultRandomProperties>;

/// Life expectancy and dependency of the adults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanLifeModel {
    pub men_life_expectancy: Randomizer,
    pub women_life_expectancy: Randomizer,
    pub nb_of_years_of_dependency: Randomizer,
}

impl Default for HumanLifeModel {
    fn default() -> Self {
        Self {
            men_life_expectancy: Randomizer::unchecked(
                80.0,
                RandomGenerator::Discrete {
                    pdf: life_expectancy_pdf(80),
                },
            ),
            women_life_expectancy: Randomizer::unchecked(
                86.0,
                RandomGenerator::Discrete {
                    pdf: life_expectancy_pdf(86),
                },
            ),
            nb_of_years_of_dependency: Randomizer::unchecked(
                2.0,
                RandomGenerator::Discrete {
                    pdf: vec![
                        (0.0, 30.0),
                        (1.0, 15.0),
                        (2.0, 15.0),
                        (3.0, 15.0),
                        (4.0, 10.0),
                        (5.0, 8.0),
                        (6.0, 7.0),
                    ],
                },
            ),
        }
    }
}

/// Triangular weights over `mode ± 15` years
fn life_expectancy_pdf(mode: i32) -> Vec<(f64, f64)> {
    (mode - 15..=mode + 15)
        .map(|age| (f64::from(age), f64::from(16 - (age - mode).abs())))
        .collect()
}

fn whole(value: f64) -> i32 {
    // drawn values stay within human ages
    value.round() as i32
}

impl HumanLifeModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.men_life_expectancy.generator.validate()?;
        self.women_life_expectancy.generator.validate()?;
        self.nb_of_years_of_dependency.generator.validate()
    }

    fn life_expectancy(&mut self, sex: Sex) -> &mut Randomizer {
        match sex {
            Sex::Male => &mut self.men_life_expectancy,
            Sex::Female => &mut self.women_life_expectancy,
        }
    }

    /// Draw new properties for every adult of `family` and apply them
    pub fn next_run<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        family: &mut Family,
        first_year: i32,
    ) -> Result<DictionaryOfAdultRandomProperties, ModelError> {
        let mut drawn = DictionaryOfAdultRandomProperties::new();
        for person in family.members_mut().filter(|p| p.is_adult()) {
            let age_of_death = whole(self.life_expectancy(person.sex()).next(rng)?);
            let years = whole(self.nb_of_years_of_dependency.next(rng)?);
            let properties = clamped(person, first_year, age_of_death, years);
            apply(person, properties);
            drawn.insert(person.name().to_string(), properties);
        }
        Ok(drawn)
    }

    /// Replay the properties of a recorded run; adults absent from
    /// `properties` keep their configured values
    pub fn set_random_values(
        &mut self,
        properties: &DictionaryOfAdultRandomProperties,
        family: &mut Family,
    ) {
        for person in family.members_mut().filter(|p| p.is_adult()) {
            if let Some(recorded) = properties.get(person.name()) {
                let sex = person.sex();
                self.life_expectancy(sex)
                    .set_random_value(f64::from(recorded.age_of_death));
                self.nb_of_years_of_dependency
                    .set_random_value(f64::from(recorded.nb_of_years_of_dependency));
                apply(person, *recorded);
            }
        }
    }

    /// Properties currently held by the adults of `family`
    #[must_use]
    pub fn current_properties(family: &Family) -> DictionaryOfAdultRandomProperties {
        family
            .adults()
            .filter_map(|person| {
                person.adult().map(|adult| {
                    (
                        person.name().to_string(),
                        AdultRandomProperties {
                            age_of_death: person.core.age_of_death,
                            nb_of_years_of_dependency: adult.nb_of_years_of_dependency,
                        },
                    )
                })
            })
            .collect()
    }

    pub fn reset_random_history(&mut self) {
        self.men_life_expectancy.reset_random_history();
        self.women_life_expectancy.reset_random_history();
        self.nb_of_years_of_dependency.reset_random_history();
    }

    /// Append the values of a run made on another copy of the model
    pub fn record_history(
        &mut self,
        family: &Family,
        properties: &DictionaryOfAdultRandomProperties,
    ) {
        for person in family.adults() {
            if let Some(recorded) = properties.get(person.name()) {
                self.life_expectancy(person.sex())
                    .record_history([f64::from(recorded.age_of_death)]);
                self.nb_of_years_of_dependency
                    .record_history([f64::from(recorded.nb_of_years_of_dependency)]);
            }
        }
    }
}

/// Alive at the end of the first year, dependency not before 65
fn clamped(
    person: &Person,
    first_year: i32,
    age_of_death: i32,
    years: i32,
) -> AdultRandomProperties {
    let age_of_death = age_of_death.max(person.age(first_year) + 1);
    let nb_of_years_of_dependency = years.clamp(0, (age_of_death - MIN_AGE_OF_DEPENDENCY).max(0));
    AdultRandomProperties {
        age_of_death,
        nb_of_years_of_dependency,
    }
}

fn apply(person: &mut Person, properties: AdultRandomProperties) {
    person.core.age_of_death = properties.age_of_death;
    if let Some(adult) = person.adult_mut() {
        adult.nb_of_years_of_dependency = properties.nb_of_years_of_dependency;
    }
}
