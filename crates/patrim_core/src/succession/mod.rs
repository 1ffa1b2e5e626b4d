//! Legal and life-insurance successions

mod manager;
mod records;

pub use manager::{SuccessionManager, SuccessionOutcome};
pub use records::{Inheritance, MissingCapital, Succession, SuccessionKind};
