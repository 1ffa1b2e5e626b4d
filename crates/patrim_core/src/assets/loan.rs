use serde::{Deserialize, Serialize};

use super::{EconomyView, Ownable};
use crate::error::ConfigError;
use crate::ownership::Ownership;

/// Amortized loan with constant yearly payments from `first_year` to `last_year`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub name: String,
    pub ownership: Ownership,
    /// Borrowed capital, negative
    pub loaned_value: f64,
    pub interest_rate: f64,
    pub first_year: i32,
    pub last_year: i32,
    #[serde(default)]
    pub yearly_insurance: f64,
}

impl Loan {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loaned_value > 0.0 {
            return Err(ConfigError::invalid(
                format!("{}.loaned_value", self.name),
                "a liability must be negative",
            ));
        }
        if self.last_year < self.first_year {
            return Err(ConfigError::invalid(
                format!("{}.last_year", self.name),
                "must not be before first_year",
            ));
        }
        if self.interest_rate <= -1.0 {
            return Err(ConfigError::invalid(
                format!("{}.interest_rate", self.name),
                "must be greater than -100 %",
            ));
        }
        Ok(())
    }

    fn nb_payments(&self) -> i32 {
        self.last_year - self.first_year + 1
    }

    /// Constant annuity, insurance excluded
    #[must_use]
    pub fn annuity(&self) -> f64 {
        let principal = -self.loaned_value;
        let n = self.nb_payments();
        let r = self.interest_rate;
        if r.abs() < 1e-12 {
            principal / f64::from(n)
        } else {
            principal * r / (1.0 - (1.0 + r).powi(-n))
        }
    }

    /// Principal still owed after `nb_paid` annuities
    fn remaining_principal(&self, nb_paid: i32) -> f64 {
        let principal = -self.loaned_value;
        let r = self.interest_rate;
        if r.abs() < 1e-12 {
            return (principal - self.annuity() * f64::from(nb_paid)).max(0.0);
        }
        let growth = (1.0 + r).powi(nb_paid);
        (principal * growth - self.annuity() * (growth - 1.0) / r).max(0.0)
    }

    /// Amount paid during `year`, insurance included
    #[must_use]
    pub fn yearly_payment(&self, year: i32) -> f64 {
        if (self.first_year..=self.last_year).contains(&year) {
            self.annuity() + self.yearly_insurance
        } else {
            0.0
        }
    }

    /// Capital received when the loan starts
    #[must_use]
    pub fn proceeds(&self, year: i32) -> f64 {
        if year == self.first_year {
            -self.loaned_value
        } else {
            0.0
        }
    }
}

impl Ownable for Loan {
    fn name(&self) -> &str {
        &self.name
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }

    /// Remaining principal (negative) after the payments of `first_year..=year`
    fn value(&self, year: i32, _economy: &EconomyView) -> f64 {
        if year < self.first_year || year >= self.last_year {
            return 0.0;
        }
        -self.remaining_principal(year - self.first_year + 1)
    }
}

/// Debt with no amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub ownership: Ownership,
    /// Negative
    pub value: f64,
}

impl Debt {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.value > 0.0 {
            return Err(ConfigError::invalid(
                format!("{}.value", self.name),
                "a liability must be negative",
            ));
        }
        Ok(())
    }
}

impl Ownable for Debt {
    fn name(&self) -> &str {
        &self.name
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }

    fn value(&self, _year: i32, _economy: &EconomyView) -> f64 {
        self.value
    }
}
