//! Scalar random variables with history recording and replay
//!
//! A `Randomizer` wraps a distribution together with a deterministic default
//! value. In random mode the last drawn sample is used. Every draw is
//! appended to the history so a Monte Carlo batch can be audited; replayed
//! values are not, so replaying a run leaves the history unchanged.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How uncertain variables are evaluated during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Every uncertain variable takes its default (expected) value
    #[default]
    Deterministic,
    /// Uncertain variables are sampled once per run
    Random,
}

/// Distribution of a scalar random variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RandomGenerator {
    /// Beta(alpha, beta) rescaled on [min, max]
    Beta {
        alpha: f64,
        beta: f64,
        min: f64,
        max: f64,
    },
    /// Weighted categorical distribution over `(value, weight)` pairs
    Discrete { pdf: Vec<(f64, f64)> },
    Uniform { min: f64, max: f64 },
}

impl RandomGenerator {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            RandomGenerator::Beta {
                alpha,
                beta,
                min,
                max,
            } => {
                if !(*alpha > 0.0 && *beta > 0.0 && alpha.is_finite() && beta.is_finite()) {
                    return Err(ModelError::InvalidDistribution {
                        generator: "Beta",
                        reason: "alpha and beta must be positive and finite",
                    });
                }
                if !(min < max) {
                    return Err(ModelError::InvalidDistribution {
                        generator: "Beta",
                        reason: "min must be lower than max",
                    });
                }
            }
            RandomGenerator::Discrete { pdf } => {
                if pdf.is_empty() {
                    return Err(ModelError::InvalidDistribution {
                        generator: "Discrete",
                        reason: "probability table is empty",
                    });
                }
                if pdf.iter().any(|(_, w)| *w < 0.0 || !w.is_finite())
                    || pdf.iter().map(|(_, w)| w).sum::<f64>() <= 0.0
                {
                    return Err(ModelError::InvalidDistribution {
                        generator: "Discrete",
                        reason: "weights must be non-negative with a positive sum",
                    });
                }
            }
            RandomGenerator::Uniform { min, max } => {
                if !(min <= max) {
                    return Err(ModelError::InvalidDistribution {
                        generator: "Uniform",
                        reason: "min must not exceed max",
                    });
                }
            }
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, ModelError> {
        match self {
            RandomGenerator::Beta {
                alpha,
                beta,
                min,
                max,
            } => rand_distr::Beta::new(*alpha, *beta)
                .map(|d| min + (max - min) * d.sample(rng))
                .map_err(|_| ModelError::InvalidDistribution {
                    generator: "Beta",
                    reason: "alpha and beta must be positive and finite",
                }),
            RandomGenerator::Discrete { pdf } => WeightedIndex::new(pdf.iter().map(|(_, w)| *w))
                .map(|d| pdf[d.sample(rng)].0)
                .map_err(|_| ModelError::InvalidDistribution {
                    generator: "Discrete",
                    reason: "weights must be non-negative with a positive sum",
                }),
            RandomGenerator::Uniform { min, max } => {
                if min == max {
                    Ok(*min)
                } else {
                    Ok(rng.random_range(*min..*max))
                }
            }
        }
    }

    /// Expected value of the distribution
    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            RandomGenerator::Beta {
                alpha,
                beta,
                min,
                max,
            } => min + (max - min) * alpha / (alpha + beta),
            RandomGenerator::Discrete { pdf } => {
                let total: f64 = pdf.iter().map(|(_, w)| w).sum();
                if total <= 0.0 {
                    0.0
                } else {
                    pdf.iter().map(|(v, w)| v * w).sum::<f64>() / total
                }
            }
            RandomGenerator::Uniform { min, max } => (min + max) / 2.0,
        }
    }
}

/// A random variable with a deterministic default and a replayable history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Randomizer {
    pub default_value: f64,
    pub generator: RandomGenerator,
    #[serde(skip)]
    random_value: Option<f64>,
    #[serde(skip)]
    history: Vec<f64>,
}

impl Randomizer {
    pub fn new(default_value: f64, generator: RandomGenerator) -> Result<Self, ModelError> {
        generator.validate()?;
        Ok(Self {
            default_value,
            generator,
            random_value: None,
            history: Vec::new(),
        })
    }

    /// Build from parameters known to be valid (built-in defaults)
    pub(crate) fn unchecked(default_value: f64, generator: RandomGenerator) -> Self {
        Self {
            default_value,
            generator,
            random_value: None,
            history: Vec::new(),
        }
    }

    /// Randomizer whose default is the distribution mean
    pub fn with_mean_default(generator: RandomGenerator) -> Result<Self, ModelError> {
        let default_value = generator.mean();
        Self::new(default_value, generator)
    }

    /// Current value: the default in deterministic mode, the last draw otherwise
    #[must_use]
    pub fn value(&self, mode: SimulationMode) -> f64 {
        match mode {
            SimulationMode::Deterministic => self.default_value,
            SimulationMode::Random => self.random_value.unwrap_or(self.default_value),
        }
    }

    /// Draw a new sample and record it
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<f64, ModelError> {
        let value = self.generator.sample(rng)?;
        self.random_value = Some(value);
        self.history.push(value);
        Ok(value)
    }

    /// Overwrite the last drawn value without consuming randomness or
    /// touching the history
    pub fn set_random_value(&mut self, value: f64) {
        self.random_value = Some(value);
    }

    pub fn reset_random_history(&mut self) {
        self.history.clear();
    }

    /// Append values drawn elsewhere (e.g. by a per-run copy)
    pub fn record_history(&mut self, values: impl IntoIterator<Item = f64>) {
        self.history.extend(values);
    }

    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn beta() -> RandomGenerator {
        RandomGenerator::Beta {
            alpha: 2.0,
            beta: 2.0,
            min: 0.0,
            max: 0.04,
        }
    }

    #[test]
    fn test_default_before_first_draw() {
        let r = Randomizer::new(0.02, beta()).unwrap();
        assert_eq!(r.value(SimulationMode::Deterministic), 0.02);
        assert_eq!(r.value(SimulationMode::Random), 0.02);
        assert!(r.history().is_empty());
    }

    #[test]
    fn test_next_records_history_and_stays_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut r = Randomizer::new(0.02, beta()).unwrap();
        for _ in 0..50 {
            let v = r.next(&mut rng).unwrap();
            assert!((0.0..=0.04).contains(&v));
            assert_eq!(r.value(SimulationMode::Random), v);
        }
        assert_eq!(r.history().len(), 50);
        assert_eq!(r.value(SimulationMode::Deterministic), 0.02);
    }

    #[test]
    fn test_set_random_value_replays() {
        let mut r = Randomizer::new(0.02, beta()).unwrap();
        r.set_random_value(0.031);
        assert_eq!(r.value(SimulationMode::Random), 0.031);
        r.reset_random_history();
        assert_eq!(r.value(SimulationMode::Random), 0.031);
    }

    #[test]
    fn test_replayed_values_leave_history_unchanged() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut r = Randomizer::new(0.02, beta()).unwrap();
        let drawn = r.next(&mut rng).unwrap();
        r.set_random_value(0.031);
        r.set_random_value(0.012);
        assert_eq!(r.history(), &[drawn]);
        assert_eq!(r.value(SimulationMode::Random), 0.012);

        r.record_history([0.012]);
        assert_eq!(r.history(), &[drawn, 0.012]);
    }

    #[test]
    fn test_discrete_draws_listed_values() {
        let mut rng = SmallRng::seed_from_u64(1);
        let generator = RandomGenerator::Discrete {
            pdf: vec![(80.0, 1.0), (85.0, 2.0), (90.0, 1.0)],
        };
        assert!((generator.mean() - 85.0).abs() < 1e-9);
        let mut r = Randomizer::with_mean_default(generator).unwrap();
        for _ in 0..100 {
            let v = r.next(&mut rng).unwrap();
            assert!([80.0, 85.0, 90.0].contains(&v));
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = Randomizer::new(0.02, beta()).unwrap();
        let mut b = a.clone();
        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(a.next(&mut rng_a).unwrap(), b.next(&mut rng_b).unwrap());
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let bad = RandomGenerator::Beta {
            alpha: -1.0,
            beta: 2.0,
            min: 0.0,
            max: 1.0,
        };
        assert!(Randomizer::new(0.0, bad).is_err());
        assert!(Randomizer::new(0.0, RandomGenerator::Discrete { pdf: vec![] }).is_err());
        let uniform = RandomGenerator::Uniform { min: 2.0, max: 1.0 };
        assert!(uniform.validate().is_err());
    }
}
