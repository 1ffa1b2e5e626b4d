//! Records produced by the simulation

mod kpi;
mod results;
mod social_accounts;

pub use kpi::{Kpi, KpiKind, KpiResult, KpiStatistics};
pub use results::{
    FailedRun, MonteCarloConfig, MonteCarloProgress, MonteCarloResult, SimulationResultLine,
};
pub use social_accounts::{
    ALL_ADULTS, ALL_PERSONS, BalanceSheetLine, CashFlowLine, NamedValue, NamedValueTable,
    SocialAccounts, YearRecord,
};
