//! Personal income tax (IRPP)

use serde::{Deserialize, Serialize};

use super::rate_grid::{RateGrid, SliceAmount};
use crate::error::{ConfigError, FiscalError};

/// Household income tax for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTax {
    pub amount: f64,
    pub marginal_rate: f64,
    /// amount / taxable income
    pub average_rate: f64,
    pub family_quotient: f64,
    /// Amount owed per bracket, for the whole household
    pub slices: Vec<SliceAmount>,
    /// Capped reduction for the children's parts, already deducted from
    /// `amount` but not from `slices`
    pub capped_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxes {
    pub grid: RateGrid,
    /// Flat professional expenses deduction on salaries
    pub salary_rebate: f64,
    pub min_salary_rebate: f64,
    pub max_salary_rebate: f64,
    /// Parts for each of the first two children
    pub child_part_first_two: f64,
    /// Parts from the third child on
    pub child_part_next: f64,
    pub single_parent_bonus: f64,
    /// Maximum tax reduction per half part granted for children
    pub half_part_cap: f64,
}

impl Default for IncomeTaxes {
    fn default() -> Self {
        Self {
            grid: RateGrid::from_pairs(&[
                (0.0, 0.0),
                (10_225.0, 0.11),
                (26_070.0, 0.30),
                (74_545.0, 0.41),
                (160_336.0, 0.45),
            ]),
            salary_rebate: 0.10,
            min_salary_rebate: 448.0,
            max_salary_rebate: 12_829.0,
            child_part_first_two: 0.5,
            child_part_next: 1.0,
            single_parent_bonus: 0.5,
            half_part_cap: 1_592.0,
        }
    }
}

impl IncomeTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate("income_taxes.grid")?;
        if !(0.0..=1.0).contains(&self.salary_rebate) {
            return Err(ConfigError::invalid(
                "income_taxes.salary_rebate",
                "must lie in [0, 1]",
            ));
        }
        if self.min_salary_rebate > self.max_salary_rebate {
            return Err(ConfigError::invalid(
                "income_taxes.min_salary_rebate",
                "must not exceed max_salary_rebate",
            ));
        }
        if self.half_part_cap < 0.0 {
            return Err(ConfigError::invalid(
                "income_taxes.half_part_cap",
                "must be non-negative",
            ));
        }
        Ok(())
    }

    /// Taxable part of a salary after the professional expenses deduction
    #[must_use]
    pub fn taxable_salary(&self, salary: f64) -> f64 {
        if salary <= 0.0 {
            return 0.0;
        }
        let rebate = (salary * self.salary_rebate)
            .clamp(self.min_salary_rebate, self.max_salary_rebate)
            .min(salary);
        salary - rebate
    }

    /// Number of household parts
    pub fn family_quotient(&self, nb_adults: usize, nb_children: usize) -> Result<f64, FiscalError> {
        if nb_adults == 0 {
            return Err(FiscalError::NoAdult);
        }
        let first_two = nb_children.min(2) as f64;
        let next = nb_children.saturating_sub(2) as f64;
        let mut quotient = nb_adults as f64
            + first_two * self.child_part_first_two
            + next * self.child_part_next;
        if nb_adults == 1 && nb_children > 0 {
            quotient += self.single_parent_bonus;
        }
        Ok(quotient)
    }

    pub fn irpp(
        &self,
        taxable_income: f64,
        nb_adults: usize,
        nb_children: usize,
    ) -> Result<IncomeTax, FiscalError> {
        let quotient = self.family_quotient(nb_adults, nb_children)?;
        let base = taxable_income.max(0.0);

        let with_children = self.grid.tax(base / quotient)? * quotient;
        // capped advantage brought by the extra parts
        let adults_parts = nb_adults as f64;
        let without_children = self.grid.tax(base / adults_parts)? * adults_parts;
        let extra_half_parts = (quotient - adults_parts) * 2.0;
        let capped_reduction = extra_half_parts * self.half_part_cap;

        // brackets follow the parts the amount is computed on
        let (parts, amount, capped_reduction) =
            if without_children - capped_reduction > with_children {
                (adults_parts, without_children - capped_reduction, capped_reduction)
            } else {
                (quotient, with_children, 0.0)
            };
        let slices = self
            .grid
            .slices(base / parts)?
            .into_iter()
            .map(|s| SliceAmount {
                base: s.base * parts,
                amount: s.amount * parts,
                ..s
            })
            .collect();

        Ok(IncomeTax {
            amount,
            marginal_rate: self.grid.marginal_rate(base / parts)?,
            average_rate: if base > 0.0 { amount / base } else { 0.0 },
            family_quotient: quotient,
            slices,
            capped_reduction,
        })
    }
}
