//! Fractional ownership records and their transfer on death

mod clause;
#[allow(clippy::module_inception)]
mod ownership;

pub use clause::{ClauseRecipients, LifeInsuranceClause};
pub use ownership::{
    EvaluationMethod, InheritanceFiscalOption, Owner, Ownership, ShareKind, ShareTransfer,
    ValuationContext,
};
