//! Household wealth projection library
//!
//! This crate projects the wealth of a French household year after year and
//! evaluates how robust the projection is to uncertainty. It supports:
//! - Work income, unemployment allowance and pensions (general and
//!   complementary regimes)
//! - Real estate, SCPI, periodic and free investments, loans and debts
//! - Income, social, capital-gain, inheritance and life-insurance taxes
//! - Ownership with usufruct and bare ownership, transferred on each death
//! - Monte Carlo runs over life expectancy, market returns and inflation,
//!   with exact replay of any recorded run
//!
//! # Builder DSL
//!
//! ```ignore
//! use patrim_core::config::{AdultBuilder, Model, ModelConfig, Scenario};
//! use patrim_core::person::{Family, Sex};
//! use patrim_core::random::SimulationMode;
//! use patrim_core::simulation::Simulation;
//! use jiff::civil::date;
//!
//! let scenario = Scenario {
//!     family: Family::from_members(vec![
//!         AdultBuilder::new("Lionel", Sex::Male, date(1965, 4, 15))
//!             .salary(60_000.0, 50_000.0, 47_000.0, 1_000.0)
//!             .build(),
//!     ])?,
//!     ..Default::default()
//! };
//! let model = Model::from_config(ModelConfig::default())?;
//! let outcome = Simulation::new(2025, 30).run_one(&scenario, &model, SimulationMode::Deterministic)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod clock;
pub mod date_math;
pub mod error;
pub mod random;
pub mod report;
pub mod simulation;
pub mod simulation_state;
pub mod succession;

// ============================================================================
// Domain modules
// ============================================================================

pub mod assets;
pub mod config;
pub mod economy;
pub mod expense;
pub mod fiscal;
pub mod model;
pub mod ownership;
pub mod person;
pub mod retirement;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{AdultBuilder, ChildBuilder, Model, ModelConfig, Scenario};
pub use error::{Result, SimulationError};
pub use random::SimulationMode;
pub use simulation::{RunOutcome, Simulation, SimulationStatus, simulate};
