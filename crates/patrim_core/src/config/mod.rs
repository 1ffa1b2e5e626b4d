//! Model configuration and household scenario
//!
//! A [`ModelConfig`] holds every externally configured parameter: fiscal
//! tables, distributions of the uncertain variables, retirement regimes and
//! the safety margins. It only becomes usable once validated into a
//! [`Model`], which every simulation entry point requires.
//!
//! A [`Scenario`] describes the household: family, assets and liabilities,
//! life expenses and the KPIs to evaluate.

mod builder;

pub use builder::{AdultBuilder, ChildBuilder};

use serde::{Deserialize, Serialize};

use crate::assets::Patrimoine;
use crate::economy::{EconomyModel, HumanLifeModel, SocioEconomyModel};
use crate::error::ConfigError;
use crate::expense::LifeExpenses;
use crate::fiscal::FiscalModel;
use crate::model::Kpi;
use crate::person::Family;
use crate::retirement::RetirementModel;

pub const DEFAULT_MODEL_VERSION: &str = "FR-2022";

fn default_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

fn default_expense_correction_factor() -> f64 {
    1.0
}

fn default_missing_capital_correction_factor() -> f64 {
    1.3
}

fn default_true() -> bool {
    true
}

/// Every externally configured parameter of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Name of the set of rules, e.g. the fiscal year of the tables
    #[serde(default = "default_version")]
    pub version: String,
    pub fiscal: FiscalModel,
    pub economy: EconomyModel,
    pub socio_economy: SocioEconomyModel,
    pub human_life: HumanLifeModel,
    pub retirement: RetirementModel,
    /// Sample a yearly market return around the run averages
    #[serde(default = "default_true")]
    pub simulate_volatility: bool,
    /// Applied to every life expense
    #[serde(default = "default_expense_correction_factor")]
    pub expense_correction_factor: f64,
    /// Margin on the inheritance tax a child must be able to pay
    #[serde(default = "default_missing_capital_correction_factor")]
    pub missing_capital_correction_factor: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            fiscal: FiscalModel::default(),
            economy: EconomyModel::default(),
            socio_economy: SocioEconomyModel::default(),
            human_life: HumanLifeModel::default(),
            retirement: RetirementModel::default(),
            simulate_volatility: true,
            expense_correction_factor: default_expense_correction_factor(),
            missing_capital_correction_factor: default_missing_capital_correction_factor(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::invalid("version", "must not be empty"));
        }
        self.fiscal.validate()?;
        self.economy.validate()?;
        self.socio_economy.validate()?;
        self.human_life.validate()?;
        self.retirement.validate()?;
        if !(self.expense_correction_factor.is_finite() && self.expense_correction_factor > 0.0) {
            return Err(ConfigError::invalid(
                "expense_correction_factor",
                "must be positive",
            ));
        }
        if !(self.missing_capital_correction_factor.is_finite()
            && self.missing_capital_correction_factor >= 1.0)
        {
            return Err(ConfigError::invalid(
                "missing_capital_correction_factor",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// A validated model, ready to drive simulations
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub(crate) config: ModelConfig,
}

impl Model {
    pub fn from_config(config: ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(version = %config.version, "model loaded");
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.config.version
    }

    #[must_use]
    pub fn fiscal(&self) -> &FiscalModel {
        &self.config.fiscal
    }

    #[must_use]
    pub fn economy(&self) -> &EconomyModel {
        &self.config.economy
    }

    #[must_use]
    pub fn socio_economy(&self) -> &SocioEconomyModel {
        &self.config.socio_economy
    }

    #[must_use]
    pub fn human_life(&self) -> &HumanLifeModel {
        &self.config.human_life
    }

    #[must_use]
    pub fn retirement(&self) -> &RetirementModel {
        &self.config.retirement
    }

    /// Forget the values drawn by previous batches
    pub fn reset_random_history(&mut self) {
        self.config.economy.reset_random_history();
        self.config.socio_economy.reset_random_history();
        self.config.human_life.reset_random_history();
    }
}

/// The household being projected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub family: Family,
    pub patrimoine: Patrimoine,
    pub expenses: LifeExpenses,
    pub kpis: Vec<Kpi>,
}

impl Scenario {
    /// Check names, ownerships and time spans before any run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.family.validate()?;
        if self.family.adults().next().is_none() {
            return Err(ConfigError::invalid("family", "must have at least one adult"));
        }
        self.patrimoine.validate()?;
        for item in self.patrimoine.items() {
            for name in item.ownership().owner_names() {
                if self.family.member(name).is_none() {
                    return Err(ConfigError::UnknownPerson {
                        context: format!("ownership of '{}'", item.name()),
                        name: name.to_string(),
                    });
                }
            }
        }
        self.expenses.validate(&self.family)?;
        for (i, kpi) in self.kpis.iter().enumerate() {
            kpi.validate()?;
            if self.kpis[..i].iter().any(|k| k.name == kpi.name) {
                return Err(ConfigError::invalid(
                    format!("kpis.{}", kpi.name),
                    "KPI names must be unique",
                ));
            }
        }
        Ok(())
    }
}
