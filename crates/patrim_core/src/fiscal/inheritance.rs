//! Inheritance taxes: legal succession, life insurance (art. 990 I) and
//! usufruct valuation (art. 669)

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::rate_grid::RateGrid;
use crate::error::{ConfigError, FiscalError};

/// Relationship between the decedent and an heir
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    Spouse,
    Child,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InheritanceTaxes {
    pub child_allowance: f64,
    pub child_grid: RateGrid,
    pub other_allowance: f64,
    pub other_grid: RateGrid,
}

impl Default for InheritanceTaxes {
    fn default() -> Self {
        Self {
            child_allowance: 100_000.0,
            child_grid: RateGrid::from_pairs(&[
                (0.0, 0.05),
                (8_072.0, 0.10),
                (12_109.0, 0.15),
                (15_932.0, 0.20),
                (552_324.0, 0.30),
                (902_838.0, 0.40),
                (1_805_677.0, 0.45),
            ]),
            other_allowance: 1_594.0,
            other_grid: RateGrid::from_pairs(&[(0.0, 0.60)]),
        }
    }
}

impl InheritanceTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.child_grid.validate("inheritance_taxes.child_grid")?;
        self.other_grid.validate("inheritance_taxes.other_grid")?;
        if self.child_allowance < 0.0 || self.other_allowance < 0.0 {
            return Err(ConfigError::invalid(
                "inheritance_taxes.allowance",
                "must be non-negative",
            ));
        }
        Ok(())
    }

    /// Tax owed by one heir on the share received (spouses are exempt)
    pub fn heir_tax(&self, received: f64, relationship: Relationship) -> Result<f64, FiscalError> {
        let received = received.max(0.0);
        match relationship {
            Relationship::Spouse => Ok(0.0),
            Relationship::Child => self
                .child_grid
                .tax((received - self.child_allowance).max(0.0)),
            Relationship::Other => self
                .other_grid
                .tax((received - self.other_allowance).max(0.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeInsuranceTaxes {
    /// Allowance per beneficiary
    pub allowance: f64,
    pub grid: RateGrid,
    /// Contracts opened before this date are exempt
    pub cutoff_date: Date,
}

impl Default for LifeInsuranceTaxes {
    fn default() -> Self {
        Self {
            allowance: 152_500.0,
            grid: RateGrid::from_pairs(&[(0.0, 0.20), (700_000.0, 0.3125)]),
            cutoff_date: jiff::civil::date(1991, 11, 20),
        }
    }
}

impl LifeInsuranceTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate("life_insurance_taxes.grid")?;
        if self.allowance < 0.0 {
            return Err(ConfigError::invalid(
                "life_insurance_taxes.allowance",
                "must be non-negative",
            ));
        }
        Ok(())
    }

    /// Flat levy owed by one beneficiary
    pub fn flat_tax(
        &self,
        taxable: f64,
        relationship: Relationship,
        opening_date: Option<Date>,
    ) -> Result<f64, FiscalError> {
        if relationship == Relationship::Spouse {
            return Ok(0.0);
        }
        if opening_date.is_some_and(|date| date < self.cutoff_date) {
            return Ok(0.0);
        }
        self.grid.tax((taxable.max(0.0) - self.allowance).max(0.0))
    }
}

/// Fiscal value of usufruct by age of the usufructuary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demembrement {
    /// `(age_below, usufruct_ratio)` sorted by age
    pub scale: Vec<(i32, f64)>,
    /// Ratio beyond the last age of the scale
    pub last_ratio: f64,
}

impl Default for Demembrement {
    fn default() -> Self {
        Self {
            scale: vec![
                (21, 0.9),
                (31, 0.8),
                (41, 0.7),
                (51, 0.6),
                (61, 0.5),
                (71, 0.4),
                (81, 0.3),
                (91, 0.2),
            ],
            last_ratio: 0.1,
        }
    }
}

impl Demembrement {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(ConfigError::invalid(
                "demembrement.scale",
                "ages must be increasing",
            ));
        }
        if self
            .scale
            .iter()
            .map(|(_, r)| *r)
            .chain([self.last_ratio])
            .any(|r| !(0.0..=1.0).contains(&r))
        {
            return Err(ConfigError::invalid(
                "demembrement.scale",
                "ratios must lie in [0, 1]",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn usufruct_ratio(&self, usufructuary_age: i32) -> f64 {
        self.scale
            .iter()
            .find(|(age_below, _)| usufructuary_age < *age_below)
            .map_or(self.last_ratio, |(_, ratio)| *ratio)
    }

    /// `(usufruct, bare)` values
    #[must_use]
    pub fn split(&self, value: f64, usufructuary_age: i32) -> (f64, f64) {
        let usufruct = value * self.usufruct_ratio(usufructuary_age);
        (usufruct, value - usufruct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_inheritance() {
        let taxes = InheritanceTaxes::default();
        assert_eq!(taxes.heir_tax(90_000.0, Relationship::Child).unwrap(), 0.0);
        // 8_072 × 5 % + 4_037 × 10 % + 3_823 × 15 % + 34_068 × 20 %
        let owed = taxes.heir_tax(150_000.0, Relationship::Child).unwrap();
        assert!((owed - 8_194.35).abs() < 0.01);
        assert_eq!(taxes.heir_tax(1e6, Relationship::Spouse).unwrap(), 0.0);
        let other = taxes.heir_tax(11_594.0, Relationship::Other).unwrap();
        assert!((other - 6_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_life_insurance_flat_tax() {
        let taxes = LifeInsuranceTaxes::default();
        let opened = Some(jiff::civil::date(2005, 3, 1));
        assert_eq!(
            taxes.flat_tax(100_000.0, Relationship::Child, opened).unwrap(),
            0.0
        );
        let owed = taxes.flat_tax(252_500.0, Relationship::Child, opened).unwrap();
        assert!((owed - 20_000.0).abs() < 1e-6);
        let owed = taxes.flat_tax(952_500.0, Relationship::Child, None).unwrap();
        assert!((owed - (140_000.0 + 31_250.0)).abs() < 1e-6);
        let old = Some(jiff::civil::date(1990, 1, 1));
        assert_eq!(
            taxes.flat_tax(952_500.0, Relationship::Child, old).unwrap(),
            0.0
        );
        assert_eq!(
            taxes.flat_tax(952_500.0, Relationship::Spouse, opened).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_usufruct_scale() {
        let d = Demembrement::default();
        assert_eq!(d.usufruct_ratio(20), 0.9);
        assert_eq!(d.usufruct_ratio(21), 0.8);
        assert_eq!(d.usufruct_ratio(65), 0.4);
        assert_eq!(d.usufruct_ratio(95), 0.1);
        let (usufruct, bare) = d.split(100_000.0, 65);
        assert!((usufruct - 40_000.0).abs() < 1e-9);
        assert!((bare - 60_000.0).abs() < 1e-9);
    }
}
