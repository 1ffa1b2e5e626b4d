use serde::{Deserialize, Serialize};

use super::{
    Debt, EconomyView, FreeInvestment, Loan, Ownable, PeriodicInvestment, RealEstateAsset, Scpi,
};
use crate::error::ConfigError;
use crate::ownership::{EvaluationMethod, ValuationContext};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub real_estates: Vec<RealEstateAsset>,
    pub scpis: Vec<Scpi>,
    pub periodic_investments: Vec<PeriodicInvestment>,
    pub free_investments: Vec<FreeInvestment>,
}

impl Assets {
    /// Every asset, in declaration order of the categories
    pub fn items(&self) -> impl Iterator<Item = &dyn Ownable> {
        self.real_estates
            .iter()
            .map(|a| a as &dyn Ownable)
            .chain(self.scpis.iter().map(|a| a as &dyn Ownable))
            .chain(self.periodic_investments.iter().map(|a| a as &dyn Ownable))
            .chain(self.free_investments.iter().map(|a| a as &dyn Ownable))
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut dyn Ownable> {
        self.real_estates
            .iter_mut()
            .map(|a| a as &mut dyn Ownable)
            .chain(self.scpis.iter_mut().map(|a| a as &mut dyn Ownable))
            .chain(
                self.periodic_investments
                    .iter_mut()
                    .map(|a| a as &mut dyn Ownable),
            )
            .chain(self.free_investments.iter_mut().map(|a| a as &mut dyn Ownable))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for asset in &self.real_estates {
            asset.validate()?;
        }
        for asset in &self.scpis {
            asset.validate()?;
        }
        for asset in &self.periodic_investments {
            asset.validate()?;
        }
        for asset in &self.free_investments {
            asset.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Liabilities {
    pub loans: Vec<Loan>,
    pub debts: Vec<Debt>,
}

impl Liabilities {
    pub fn items(&self) -> impl Iterator<Item = &dyn Ownable> {
        self.loans
            .iter()
            .map(|l| l as &dyn Ownable)
            .chain(self.debts.iter().map(|l| l as &dyn Ownable))
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut dyn Ownable> {
        self.loans
            .iter_mut()
            .map(|l| l as &mut dyn Ownable)
            .chain(self.debts.iter_mut().map(|l| l as &mut dyn Ownable))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for loan in &self.loans {
            loan.validate()?;
        }
        for debt in &self.debts {
            debt.validate()?;
        }
        Ok(())
    }
}

/// Everything the household owns and owes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patrimoine {
    pub assets: Assets,
    pub liabilities: Liabilities,
}

impl Patrimoine {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.assets.validate()?;
        self.liabilities.validate()?;
        let mut names = rustc_hash::FxHashSet::default();
        for item in self.items() {
            if !names.insert(item.name()) {
                return Err(ConfigError::invalid(
                    item.name(),
                    "assets and liabilities must have unique names",
                ));
            }
            item.ownership()
                .validate()
                .map_err(|source| ConfigError::Ownership {
                    item: item.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Assets then liabilities
    pub fn items(&self) -> impl Iterator<Item = &dyn Ownable> {
        self.assets.items().chain(self.liabilities.items())
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut dyn Ownable> {
        self.assets.items_mut().chain(self.liabilities.items_mut())
    }

    #[must_use]
    pub fn assets_value(&self, year: i32, economy: &EconomyView) -> f64 {
        self.assets.items().map(|a| a.value(year, economy)).sum()
    }

    /// Negative
    #[must_use]
    pub fn liabilities_value(&self, year: i32, economy: &EconomyView) -> f64 {
        self.liabilities.items().map(|l| l.value(year, economy)).sum()
    }

    /// Net worth of the household
    #[must_use]
    pub fn value(&self, year: i32, economy: &EconomyView) -> f64 {
        self.assets_value(year, economy) + self.liabilities_value(year, economy)
    }

    /// Net worth of `owner`
    #[must_use]
    pub fn owned_value(
        &self,
        owner: &str,
        year: i32,
        economy: &EconomyView,
        method: EvaluationMethod,
        ctx: &ValuationContext<'_>,
    ) -> f64 {
        self.items()
            .map(|item| item.owned_value(owner, year, economy, method, ctx))
            .sum()
    }

    /// Free investments back to their initial state, before a new run
    pub fn reset(&mut self) {
        for investment in &mut self.assets.free_investments {
            investment.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{InterestRate, InvestmentState, InvestmentType};
    use crate::economy::Rates;
    use crate::fiscal::Demembrement;
    use crate::ownership::{Owner, Ownership};
    use crate::person::AgeProvider;

    struct NoAges;

    impl AgeProvider for NoAges {
        fn age_of(&self, _name: &str, _year: i32) -> Option<i32> {
            Some(60)
        }
    }

    fn economy() -> EconomyView {
        EconomyView {
            inflation: 0.0,
            rates: Rates {
                secured: 0.02,
                stock: 0.06,
            },
        }
    }

    fn patrimoine() -> Patrimoine {
        let shared = Ownership::Undismembered {
            full_owners: vec![Owner::new("Lionel", 50.0), Owner::new("Vanessa", 50.0)],
        };
        Patrimoine {
            assets: Assets {
                real_estates: vec![RealEstateAsset {
                    name: "House".to_string(),
                    ownership: shared.clone(),
                    buying_year: 2000,
                    buying_price: 150_000.0,
                    estimated_value: 400_000.0,
                    selling_year: None,
                    selling_price: None,
                    is_inhabited: true,
                    rental: None,
                    yearly_local_taxes: 2_000.0,
                }],
                free_investments: vec![FreeInvestment::new(
                    "Savings",
                    Ownership::full("Vanessa"),
                    InvestmentType::Other,
                    InterestRate::Market { stock_ratio: 0.5 },
                    InvestmentState {
                        investment: 50_000.0,
                        interest: 0.0,
                    },
                )],
                ..Default::default()
            },
            liabilities: Liabilities {
                debts: vec![Debt {
                    name: "Family loan".to_string(),
                    ownership: shared,
                    value: -20_000.0,
                }],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_values() {
        let patrimoine = patrimoine();
        assert!(patrimoine.validate().is_ok());
        assert_eq!(patrimoine.assets_value(2025, &economy()), 450_000.0);
        assert_eq!(patrimoine.liabilities_value(2025, &economy()), -20_000.0);
        assert_eq!(patrimoine.value(2025, &economy()), 430_000.0);
        assert_eq!(patrimoine.items().count(), 3);
    }

    #[test]
    fn test_owned_value_sums_to_value() {
        let patrimoine = patrimoine();
        let demembrement = Demembrement::default();
        let ctx = ValuationContext {
            year: 2025,
            ages: &NoAges,
            demembrement: &demembrement,
        };
        let lionel =
            patrimoine.owned_value("Lionel", 2025, &economy(), EvaluationMethod::Patrimoine, &ctx);
        let vanessa =
            patrimoine.owned_value("Vanessa", 2025, &economy(), EvaluationMethod::Patrimoine, &ctx);
        assert!((lionel - 190_000.0).abs() < 1e-9);
        assert!((lionel + vanessa - 430_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_free_investments() {
        let mut patrimoine = patrimoine();
        patrimoine.assets.free_investments[0].deposit(1_000.0);
        assert_eq!(patrimoine.assets_value(2025, &economy()), 451_000.0);
        patrimoine.reset();
        assert_eq!(patrimoine.assets_value(2025, &economy()), 450_000.0);
    }

    #[test]
    fn test_invalid_ownership_rejected() {
        let mut patrimoine = patrimoine();
        patrimoine.assets.real_estates[0].ownership = Ownership::Undismembered {
            full_owners: vec![Owner::new("Lionel", 40.0)],
        };
        assert!(matches!(
            patrimoine.validate(),
            Err(ConfigError::Ownership { .. })
        ));
    }
}
