use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Taxes on real estate sale gains, with holding-period deductions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealEstateCapitalGainTaxes {
    pub income_tax_rate: f64,
    pub social_levies: f64,
    /// Years of holding before any deduction starts
    pub deduction_start: u32,
    /// Income tax deduction per year from `deduction_start + 1` to year 21
    pub income_tax_deduction_per_year: f64,
    /// Income tax deduction of the 22nd year
    pub income_tax_last_deduction: f64,
    pub social_deduction_per_year: f64,
    pub social_deduction_22nd_year: f64,
    /// Social levies deduction per year from year 23 to year 30
    pub social_deduction_after_22: f64,
}

impl Default for RealEstateCapitalGainTaxes {
    fn default() -> Self {
        Self {
            income_tax_rate: 0.19,
            social_levies: 0.172,
            deduction_start: 5,
            income_tax_deduction_per_year: 0.06,
            income_tax_last_deduction: 0.04,
            social_deduction_per_year: 0.0165,
            social_deduction_22nd_year: 0.016,
            social_deduction_after_22: 0.09,
        }
    }
}

impl RealEstateCapitalGainTaxes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rate) in [
            ("capital_gain_taxes.income_tax_rate", self.income_tax_rate),
            ("capital_gain_taxes.social_levies", self.social_levies),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::invalid(name, "rate must lie in [0, 1]"));
            }
        }
        Ok(())
    }

    fn years_in(&self, holding_years: u32, last: u32) -> f64 {
        f64::from(holding_years.min(last).saturating_sub(self.deduction_start))
    }

    /// Share of the gain exempted from income tax
    #[must_use]
    pub fn income_tax_deduction(&self, holding_years: u32) -> f64 {
        let mut deduction = self.years_in(holding_years, 21) * self.income_tax_deduction_per_year;
        if holding_years >= 22 {
            deduction += self.income_tax_last_deduction;
        }
        deduction.min(1.0)
    }

    /// Share of the gain exempted from social levies
    #[must_use]
    pub fn social_deduction(&self, holding_years: u32) -> f64 {
        let mut deduction = self.years_in(holding_years, 21) * self.social_deduction_per_year;
        if holding_years >= 22 {
            deduction += self.social_deduction_22nd_year;
            deduction += f64::from(holding_years.min(30) - 22) * self.social_deduction_after_22;
        }
        deduction.min(1.0)
    }

    /// Taxes owed on a sale; main residences and losses are exempt
    #[must_use]
    pub fn taxes(
        &self,
        buying_price: f64,
        selling_price: f64,
        holding_years: u32,
        main_residence: bool,
    ) -> f64 {
        let gain = selling_price - buying_price;
        if main_residence || gain <= 0.0 {
            return 0.0;
        }
        gain * (1.0 - self.income_tax_deduction(holding_years)) * self.income_tax_rate
            + gain * (1.0 - self.social_deduction(holding_years)) * self.social_levies
    }
}
