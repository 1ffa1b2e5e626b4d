use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessionKind {
    Legal,
    LifeInsurance,
}

/// What one heir receives from one succession
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inheritance {
    pub person: String,
    /// Share of the taxable value, in percent
    pub percent: f64,
    pub brut: f64,
    pub net: f64,
    pub tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Succession {
    pub year: i32,
    pub decedent: String,
    pub kind: SuccessionKind,
    pub taxable_value: f64,
    pub inheritances: Vec<Inheritance>,
}

impl Succession {
    /// Build the records from the gross amount and tax of each heir, in order
    pub(crate) fn new(
        year: i32,
        decedent: &str,
        kind: SuccessionKind,
        received: Vec<(String, f64, f64)>,
    ) -> Self {
        let taxable_value: f64 = received.iter().map(|(_, brut, _)| brut).sum();
        let inheritances = received
            .into_iter()
            .map(|(person, brut, tax)| Inheritance {
                person,
                percent: if taxable_value.abs() > f64::EPSILON {
                    brut / taxable_value * 100.0
                } else {
                    0.0
                },
                brut,
                net: brut - tax,
                tax,
            })
            .collect();
        Self {
            year,
            decedent: decedent.to_string(),
            kind,
            taxable_value,
            inheritances,
        }
    }

    #[must_use]
    pub fn tax(&self) -> f64 {
        self.inheritances.iter().map(|i| i.tax).sum()
    }

    #[must_use]
    pub fn net(&self) -> f64 {
        self.inheritances.iter().map(|i| i.net).sum()
    }

    #[must_use]
    pub fn inheritance_of(&self, person: &str) -> Option<&Inheritance> {
        self.inheritances.iter().find(|i| i.person == person)
    }
}

/// Inheritance tax an heir cannot cover with the life-insurance capital received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingCapital {
    pub year: i32,
    pub decedent: String,
    pub heir: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_and_totals() {
        let succession = Succession::new(
            2030,
            "Lionel",
            SuccessionKind::Legal,
            vec![
                ("Vanessa".to_string(), 100_000.0, 0.0),
                ("Arthur".to_string(), 300_000.0, 20_000.0),
            ],
        );
        assert_eq!(succession.taxable_value, 400_000.0);
        assert_eq!(succession.tax(), 20_000.0);
        assert_eq!(succession.net(), 380_000.0);
        let arthur = succession.inheritance_of("Arthur").unwrap();
        assert_eq!(arthur.percent, 75.0);
        assert_eq!(arthur.net, 280_000.0);
    }

    #[test]
    fn test_empty_estate() {
        let succession = Succession::new(2030, "Lionel", SuccessionKind::LifeInsurance, Vec::new());
        assert_eq!(succession.taxable_value, 0.0);
        assert!(succession.inheritances.is_empty());
    }
}
