//! Command-line front end of the patrim projection engine
//!
//! Loads a scenario and an optional model configuration, runs a
//! deterministic projection or a Monte-Carlo batch and writes CSV reports.

pub mod logging;
pub mod run;
pub mod storage;

pub use logging::{default_data_dir, init_logging};
pub use run::{RunMode, RunReport, RunRequest, run, write_summary};
pub use storage::{OutputDirectory, StorageError, load_model, load_scenario};
