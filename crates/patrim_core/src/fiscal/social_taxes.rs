//! Social levies and net/taxable conversions per kind of revenue

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn check_rate(parameter: &str, rate: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::invalid(parameter, "rate must lie in [0, 1]"));
    }
    Ok(())
}

/// Net and taxable amounts of a gross revenue
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub brut: f64,
    pub net: f64,
    pub taxable: f64,
}

impl Revenue {
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            brut: self.brut * factor,
            net: self.net * factor,
            taxable: self.taxable * factor,
        }
    }
}

impl std::ops::Add for Revenue {
    type Output = Revenue;

    fn add(self, other: Revenue) -> Revenue {
        Revenue {
            brut: self.brut + other.brut,
            net: self.net + other.net,
            taxable: self.taxable + other.taxable,
        }
    }
}

// ============================================================================
// Pensions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionTaxes {
    pub csg_deductible: f64,
    pub csg_non_deductible: f64,
    pub crds: f64,
    pub casa: f64,
    pub rebate: f64,
    pub min_rebate: f64,
    pub max_rebate: f64,
}

impl Default for PensionTaxes {
    fn default() -> Self {
        Self {
            csg_deductible: 0.059,
            csg_non_deductible: 0.024,
            crds: 0.005,
            casa: 0.003,
            rebate: 0.10,
            min_rebate: 393.0,
            max_rebate: 3_850.0,
        }
    }
}

impl PensionTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("pension_taxes.csg_deductible", self.csg_deductible)?;
        check_rate("pension_taxes.csg_non_deductible", self.csg_non_deductible)?;
        check_rate("pension_taxes.crds", self.crds)?;
        check_rate("pension_taxes.casa", self.casa)?;
        check_rate("pension_taxes.rebate", self.rebate)?;
        if self.min_rebate > self.max_rebate {
            return Err(ConfigError::invalid(
                "pension_taxes.min_rebate",
                "must not exceed max_rebate",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn social_taxes(&self, brut: f64) -> f64 {
        brut * (self.csg_deductible + self.csg_non_deductible + self.crds + self.casa)
    }

    #[must_use]
    pub fn net(&self, brut: f64) -> f64 {
        brut - self.social_taxes(brut)
    }

    /// Net plus the non deductible levies, minus the flat 10 % deduction
    #[must_use]
    pub fn taxable(&self, brut: f64, net: f64) -> f64 {
        let before_rebate = net + brut * (self.csg_non_deductible + self.crds);
        if before_rebate <= 0.0 {
            return 0.0;
        }
        let rebate = (before_rebate * self.rebate)
            .clamp(self.min_rebate, self.max_rebate)
            .min(before_rebate);
        before_rebate - rebate
    }

    #[must_use]
    pub fn revenue(&self, brut: f64) -> Revenue {
        let net = self.net(brut);
        Revenue {
            brut,
            net,
            taxable: self.taxable(brut, net),
        }
    }
}

// ============================================================================
// Self-employed turnover (BNC)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverTaxes {
    /// Social charges on turnover
    pub social_charges: f64,
    /// Micro-BNC flat deduction
    pub micro_rebate: f64,
    pub min_micro_rebate: f64,
}

impl Default for TurnoverTaxes {
    fn default() -> Self {
        Self {
            social_charges: 0.221,
            micro_rebate: 0.34,
            min_micro_rebate: 305.0,
        }
    }
}

impl TurnoverTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("turnover_taxes.social_charges", self.social_charges)?;
        check_rate("turnover_taxes.micro_rebate", self.micro_rebate)
    }

    #[must_use]
    pub fn net(&self, turnover: f64) -> f64 {
        turnover * (1.0 - self.social_charges)
    }

    #[must_use]
    pub fn taxable(&self, turnover: f64) -> f64 {
        if turnover <= 0.0 {
            return 0.0;
        }
        let rebate = (turnover * self.micro_rebate)
            .max(self.min_micro_rebate)
            .min(turnover);
        turnover - rebate
    }
}

// ============================================================================
// Unemployment allowance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnemploymentTaxes {
    pub csg_deductible: f64,
    pub csg_non_deductible: f64,
    pub crds: f64,
    /// Contribution to the complementary pension
    pub pension_contribution: f64,
}

impl Default for UnemploymentTaxes {
    fn default() -> Self {
        Self {
            csg_deductible: 0.038,
            csg_non_deductible: 0.024,
            crds: 0.005,
            pension_contribution: 0.03,
        }
    }
}

impl UnemploymentTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("unemployment_taxes.csg_deductible", self.csg_deductible)?;
        check_rate(
            "unemployment_taxes.csg_non_deductible",
            self.csg_non_deductible,
        )?;
        check_rate("unemployment_taxes.crds", self.crds)?;
        check_rate(
            "unemployment_taxes.pension_contribution",
            self.pension_contribution,
        )
    }

    #[must_use]
    pub fn net(&self, brut: f64) -> f64 {
        brut * (1.0
            - self.csg_deductible
            - self.csg_non_deductible
            - self.crds
            - self.pension_contribution)
    }

    /// Before the professional expenses deduction
    #[must_use]
    pub fn taxable(&self, brut: f64) -> f64 {
        brut * (1.0 - self.csg_deductible - self.pension_contribution)
    }
}

// ============================================================================
// Financial and rental revenues
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRevenueTaxes {
    /// CSG + CRDS + prélèvement de solidarité
    pub social_levies: f64,
    /// Income tax part of the flat tax on gains outside tax wrappers
    pub flat_income_tax: f64,
}

impl Default for FinancialRevenueTaxes {
    fn default() -> Self {
        Self {
            social_levies: 0.172,
            flat_income_tax: 0.128,
        }
    }
}

impl FinancialRevenueTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("financial_taxes.social_levies", self.social_levies)?;
        check_rate("financial_taxes.flat_income_tax", self.flat_income_tax)
    }

    #[must_use]
    pub fn social_taxes(&self, gains: f64) -> f64 {
        gains.max(0.0) * self.social_levies
    }

    /// Social levies plus flat income tax
    #[must_use]
    pub fn flat_tax(&self, gains: f64) -> f64 {
        gains.max(0.0) * (self.social_levies + self.flat_income_tax)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalTaxes {
    /// Micro-foncier flat deduction
    pub micro_rebate: f64,
    pub social_levies: f64,
}

impl Default for RentalTaxes {
    fn default() -> Self {
        Self {
            micro_rebate: 0.30,
            social_levies: 0.172,
        }
    }
}

impl RentalTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("rental_taxes.micro_rebate", self.micro_rebate)?;
        check_rate("rental_taxes.social_levies", self.social_levies)
    }

    #[must_use]
    pub fn taxable(&self, rent: f64) -> f64 {
        rent.max(0.0) * (1.0 - self.micro_rebate)
    }

    #[must_use]
    pub fn social_taxes(&self, rent: f64) -> f64 {
        self.taxable(rent) * self.social_levies
    }

    #[must_use]
    pub fn net(&self, rent: f64) -> f64 {
        rent - self.social_taxes(rent)
    }
}
