//! Progressive bracket tables

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FiscalError};

/// One bracket: income above `floor` is taxed at `rate` up to the next floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSlice {
    pub floor: f64,
    pub rate: f64,
}

/// Amount owed within one bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceAmount {
    pub floor: f64,
    pub ceiling: Option<f64>,
    pub rate: f64,
    /// Part of the base falling in this bracket
    pub base: f64,
    pub amount: f64,
}

/// Progressive tax table, brackets sorted by increasing floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateGrid {
    slices: Vec<RateSlice>,
}

impl RateGrid {
    pub fn new(slices: Vec<RateSlice>) -> Result<Self, ConfigError> {
        let grid = Self { slices };
        grid.validate("rate grid")?;
        Ok(grid)
    }

    /// Build from `(floor, rate)` pairs known to be valid
    pub(crate) fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            slices: pairs
                .iter()
                .map(|&(floor, rate)| RateSlice { floor, rate })
                .collect(),
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let Some(first) = self.slices.first() else {
            return Err(ConfigError::invalid(name, "no bracket"));
        };
        if first.floor != 0.0 {
            return Err(ConfigError::invalid(name, "first bracket must start at 0"));
        }
        if self.slices.windows(2).any(|w| w[1].floor <= w[0].floor) {
            return Err(ConfigError::invalid(name, "bracket floors must be increasing"));
        }
        if self
            .slices
            .iter()
            .any(|s| !(0.0..=1.0).contains(&s.rate) || !s.floor.is_finite())
        {
            return Err(ConfigError::invalid(name, "rates must lie in [0, 1]"));
        }
        Ok(())
    }

    #[must_use]
    pub fn brackets(&self) -> &[RateSlice] {
        &self.slices
    }

    fn check(base: f64) -> Result<(), FiscalError> {
        if base < 0.0 || base.is_nan() {
            return Err(FiscalError::NegativeBase { base });
        }
        Ok(())
    }

    /// Amount owed in each bracket reached by `base`
    pub fn slices(&self, base: f64) -> Result<Vec<SliceAmount>, FiscalError> {
        Self::check(base)?;
        let mut result = Vec::with_capacity(self.slices.len());
        for (i, slice) in self.slices.iter().enumerate() {
            let ceiling = self.slices.get(i + 1).map(|s| s.floor);
            let in_slice = (base.min(ceiling.unwrap_or(f64::INFINITY)) - slice.floor).max(0.0);
            result.push(SliceAmount {
                floor: slice.floor,
                ceiling,
                rate: slice.rate,
                base: in_slice,
                amount: in_slice * slice.rate,
            });
        }
        Ok(result)
    }

    pub fn tax(&self, base: f64) -> Result<f64, FiscalError> {
        Ok(self.slices(base)?.iter().map(|s| s.amount).sum())
    }

    /// Rate of the highest bracket reached by `base`
    pub fn marginal_rate(&self, base: f64) -> Result<f64, FiscalError> {
        Self::check(base)?;
        Ok(self
            .slices
            .iter()
            .rev()
            .find(|s| base > s.floor)
            .or(self.slices.first())
            .map_or(0.0, |s| s.rate))
    }
}
