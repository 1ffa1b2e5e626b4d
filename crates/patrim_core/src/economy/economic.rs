use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::random::{RandomGenerator, Randomizer, SimulationMode};

/// Yearly return rates of the two asset classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub secured: f64,
    pub stock: f64,
}

impl Rates {
    /// Return of a portfolio holding `stock_ratio` (0..=1) of stocks
    #[must_use]
    pub fn mixed(&self, stock_ratio: f64) -> f64 {
        let ratio = stock_ratio.clamp(0.0, 1.0);
        self.stock * ratio + self.secured * (1.0 - ratio)
    }
}

/// Values drawn for one run, enough to replay it exactly
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomyRandomVariables {
    pub inflation: f64,
    pub secured_rate: f64,
    pub stock_rate: f64,
    /// Seed of the per-year volatility samples
    pub volatility_seed: u64,
}

fn default_secured_volatility() -> f64 {
    0.01
}

fn default_stock_volatility() -> f64 {
    0.15
}

/// Inflation and asset return rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyModel {
    pub inflation: Randomizer,
    pub secured_rate: Randomizer,
    pub stock_rate: Randomizer,
    #[serde(default = "default_secured_volatility")]
    pub secured_volatility: f64,
    #[serde(default = "default_stock_volatility")]
    pub stock_volatility: f64,

    #[serde(skip)]
    first_year: i32,
    #[serde(skip)]
    secured_samples: Vec<f64>,
    #[serde(skip)]
    stock_samples: Vec<f64>,
}

impl Default for EconomyModel {
    fn default() -> Self {
        Self {
            inflation: beta_randomizer(0.017, 0.0, 0.04),
            secured_rate: beta_randomizer(0.02, 0.0, 0.04),
            stock_rate: beta_randomizer(0.06, 0.0, 0.12),
            secured_volatility: default_secured_volatility(),
            stock_volatility: default_stock_volatility(),
            first_year: 0,
            secured_samples: Vec::new(),
            stock_samples: Vec::new(),
        }
    }
}

/// Symmetric Beta(2, 2) on [min, max] centred on the default
fn beta_randomizer(default_value: f64, min: f64, max: f64) -> Randomizer {
    Randomizer::unchecked(
        default_value,
        RandomGenerator::Beta {
            alpha: 2.0,
            beta: 2.0,
            min,
            max,
        },
    )
}

impl EconomyModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.inflation.generator.validate()?;
        self.secured_rate.generator.validate()?;
        self.stock_rate.generator.validate()?;
        if !(self.secured_volatility >= 0.0 && self.stock_volatility >= 0.0) {
            return Err(ModelError::InvalidDistribution {
                generator: "Normal",
                reason: "volatility must be non-negative",
            });
        }
        Ok(())
    }

    /// Draw the run averages and pre-generate the per-year samples
    pub fn next_run<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        simulate_volatility: bool,
        first_year: i32,
        last_year: i32,
    ) -> Result<EconomyRandomVariables, ModelError> {
        if last_year < first_year {
            return Err(ModelError::OutOfBounds {
                first_year,
                last_year,
            });
        }
        let variables = EconomyRandomVariables {
            inflation: self.inflation.next(rng)?,
            secured_rate: self.secured_rate.next(rng)?,
            stock_rate: self.stock_rate.next(rng)?,
            volatility_seed: rng.random(),
        };
        self.generate_samples(&variables, simulate_volatility, first_year, last_year)?;
        Ok(variables)
    }

    /// Replay previously drawn values
    pub fn set_random_values(
        &mut self,
        variables: &EconomyRandomVariables,
        simulate_volatility: bool,
        first_year: i32,
        last_year: i32,
    ) -> Result<(), ModelError> {
        if last_year < first_year {
            return Err(ModelError::OutOfBounds {
                first_year,
                last_year,
            });
        }
        self.inflation.set_random_value(variables.inflation);
        self.secured_rate.set_random_value(variables.secured_rate);
        self.stock_rate.set_random_value(variables.stock_rate);
        self.generate_samples(variables, simulate_volatility, first_year, last_year)
    }

    fn generate_samples(
        &mut self,
        variables: &EconomyRandomVariables,
        simulate_volatility: bool,
        first_year: i32,
        last_year: i32,
    ) -> Result<(), ModelError> {
        self.first_year = first_year;
        self.secured_samples.clear();
        self.stock_samples.clear();
        if !simulate_volatility {
            return Ok(());
        }

        let invalid = |_| ModelError::InvalidDistribution {
            generator: "Normal",
            reason: "volatility must be non-negative and finite",
        };
        let secured = Normal::new(variables.secured_rate, self.secured_volatility).map_err(invalid)?;
        let stock = Normal::new(variables.stock_rate, self.stock_volatility).map_err(invalid)?;

        let mut rng = SmallRng::seed_from_u64(variables.volatility_seed);
        for _ in first_year..=last_year {
            self.secured_samples.push(secured.sample(&mut rng));
            self.stock_samples.push(stock.sample(&mut rng));
        }
        Ok(())
    }

    /// Return rates applicable in `year`
    pub fn rates(
        &self,
        year: i32,
        mode: SimulationMode,
        simulate_volatility: bool,
    ) -> Result<Rates, ModelError> {
        if mode == SimulationMode::Deterministic || !simulate_volatility {
            return Ok(Rates {
                secured: self.secured_rate.value(mode),
                stock: self.stock_rate.value(mode),
            });
        }
        let index = usize::try_from(year - self.first_year)
            .map_err(|_| ModelError::YearNotGenerated(year))?;
        match (self.secured_samples.get(index), self.stock_samples.get(index)) {
            (Some(secured), Some(stock)) => Ok(Rates {
                secured: *secured,
                stock: *stock,
            }),
            _ => Err(ModelError::YearNotGenerated(year)),
        }
    }

    #[must_use]
    pub fn inflation(&self, mode: SimulationMode) -> f64 {
        self.inflation.value(mode)
    }

    pub fn reset_random_history(&mut self) {
        self.inflation.reset_random_history();
        self.secured_rate.reset_random_history();
        self.stock_rate.reset_random_history();
    }

    pub fn record_history(&mut self, variables: &EconomyRandomVariables) {
        self.inflation.record_history([variables.inflation]);
        self.secured_rate.record_history([variables.secured_rate]);
        self.stock_rate.record_history([variables.stock_rate]);
    }
}
