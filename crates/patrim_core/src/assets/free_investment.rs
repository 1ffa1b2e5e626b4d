use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{EconomyView, GainsTaxation, InterestRate, Ownable};
use crate::error::ConfigError;
use crate::fiscal::FiscalModel;
use crate::ownership::{LifeInsuranceClause, Ownership};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InvestmentType {
    LifeInsurance {
        clause: LifeInsuranceClause,
        /// Contracts opened before the legal cutoff are exempt of the 990 I levy
        #[serde(default)]
        opening_date: Option<Date>,
    },
    Pea,
    Other,
}

impl InvestmentType {
    #[must_use]
    pub fn taxation(&self) -> GainsTaxation {
        match self {
            InvestmentType::LifeInsurance { .. } | InvestmentType::Pea => {
                GainsTaxation::SocialLeviesOnly
            }
            InvestmentType::Other => GainsTaxation::FlatTax,
        }
    }
}

/// Capital deposited and gains accumulated on top of it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentState {
    pub investment: f64,
    pub interest: f64,
}

impl InvestmentState {
    #[must_use]
    pub fn value(&self) -> f64 {
        self.investment + self.interest
    }
}

/// Amounts of one withdrawal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Withdrawal {
    pub brut: f64,
    /// Gains contained in the withdrawal
    pub taxable_interest: f64,
    pub taxes: f64,
}

impl Withdrawal {
    #[must_use]
    pub fn net(&self) -> f64 {
        self.brut - self.taxes
    }
}

/// Investment with free deposits and withdrawals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeInvestment {
    pub name: String,
    pub ownership: Ownership,
    pub investment_type: InvestmentType,
    pub interest_rate: InterestRate,
    pub initial_state: InvestmentState,
    #[serde(skip)]
    current_state: Option<InvestmentState>,
}

impl FreeInvestment {
    pub fn new(
        name: impl Into<String>,
        ownership: Ownership,
        investment_type: InvestmentType,
        interest_rate: InterestRate,
        initial_state: InvestmentState,
    ) -> Self {
        Self {
            name: name.into(),
            ownership,
            investment_type,
            interest_rate,
            initial_state,
            current_state: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_state.investment < 0.0 || self.initial_state.value() < 0.0 {
            return Err(ConfigError::invalid(
                format!("{}.initial_state", self.name),
                "value must be non-negative",
            ));
        }
        if let InvestmentType::LifeInsurance { clause, .. } = &self.investment_type {
            clause.validate().map_err(|source| ConfigError::Ownership {
                item: format!("{} clause", self.name),
                source,
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> InvestmentState {
        self.current_state.unwrap_or(self.initial_state)
    }

    /// Back to the initial state, before a new run
    pub fn reset(&mut self) {
        self.current_state = None;
    }

    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.state().value()
    }

    #[must_use]
    pub fn is_life_insurance(&self) -> bool {
        matches!(self.investment_type, InvestmentType::LifeInsurance { .. })
    }

    #[must_use]
    pub fn clause(&self) -> Option<&LifeInsuranceClause> {
        match &self.investment_type {
            InvestmentType::LifeInsurance { clause, .. } => Some(clause),
            _ => None,
        }
    }

    pub fn clause_mut(&mut self) -> Option<&mut LifeInsuranceClause> {
        match &mut self.investment_type {
            InvestmentType::LifeInsurance { clause, .. } => Some(clause),
            _ => None,
        }
    }

    #[must_use]
    pub fn opening_date(&self) -> Option<Date> {
        match &self.investment_type {
            InvestmentType::LifeInsurance { opening_date, .. } => *opening_date,
            _ => None,
        }
    }

    /// Apply one year of return; the value never drops below zero.
    ///
    /// Returns the gain of the year.
    pub fn capitalize(&mut self, rate: f64) -> f64 {
        let mut state = self.state();
        let before = state.value();
        state.interest = (state.interest + before * rate).max(-state.investment);
        self.current_state = Some(state);
        state.value() - before
    }

    pub fn deposit(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        let mut state = self.state();
        state.investment += amount;
        self.current_state = Some(state);
    }

    /// Withdraw what is needed to get `net_wanted` after taxes on gains,
    /// capped at the current value
    pub fn withdrawal(&mut self, net_wanted: f64, fiscal: &FiscalModel) -> Withdrawal {
        let mut state = self.state();
        let value = state.value();
        if net_wanted <= 0.0 || value <= 0.0 {
            return Withdrawal::default();
        }
        let gains_ratio = state.interest.max(0.0) / value;
        let tax_rate = self.investment_type.taxation().rate(fiscal);
        let brut = (net_wanted / (1.0 - gains_ratio * tax_rate)).min(value);
        let taxable_interest = brut * gains_ratio;

        state.investment -= brut * state.investment / value;
        state.interest -= brut * state.interest / value;
        if brut >= value {
            state = InvestmentState::default();
        }
        self.current_state = Some(state);

        Withdrawal {
            brut,
            taxable_interest,
            taxes: taxable_interest * tax_rate,
        }
    }

    /// Rate in constant euros for a year with market `rates`
    #[must_use]
    pub fn real_rate(&self, rates: &crate::economy::Rates, inflation: f64) -> f64 {
        self.interest_rate.real(rates, inflation)
    }
}

impl Ownable for FreeInvestment {
    fn name(&self) -> &str {
        &self.name
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }

    /// Current value; the state is advanced year by year by the simulation
    fn value(&self, _year: i32, _economy: &EconomyView) -> f64 {
        self.current_value()
    }

    fn is_life_insurance(&self) -> bool {
        FreeInvestment::is_life_insurance(self)
    }
}
