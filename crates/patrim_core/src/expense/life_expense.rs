use serde::{Deserialize, Serialize};

use super::TimeSpan;
use crate::error::{ConfigError, TimeSpanError};
use crate::person::LifeEventResolver;

/// Spending categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[default]
    DailyLife,
    Housing,
    Children,
    Health,
    Transport,
    Leisure,
    Travel,
    Gifts,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::DailyLife,
        ExpenseCategory::Housing,
        ExpenseCategory::Children,
        ExpenseCategory::Health,
        ExpenseCategory::Transport,
        ExpenseCategory::Leisure,
        ExpenseCategory::Travel,
        ExpenseCategory::Gifts,
        ExpenseCategory::Other,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::DailyLife => "Daily life",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Children => "Children",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Leisure => "Leisure",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Gifts => "Gifts",
            ExpenseCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeExpense {
    pub name: String,
    #[serde(default)]
    pub category: ExpenseCategory,
    /// Yearly amount, per member when proportional
    pub value: f64,
    /// Scales with the number of members alive or fiscally dependent
    #[serde(default)]
    pub proportional: bool,
    pub time_span: TimeSpan,
}

impl LifeExpense {
    pub fn new(name: impl Into<String>, value: f64, proportional: bool, time_span: TimeSpan) -> Self {
        Self {
            name: name.into(),
            category: ExpenseCategory::default(),
            value,
            proportional,
            time_span,
        }
    }

    pub fn validate(&self, resolver: &dyn LifeEventResolver) -> Result<(), ConfigError> {
        if self.value < 0.0 {
            return Err(ConfigError::invalid(
                format!("{}.value", self.name),
                "must be non-negative",
            ));
        }
        self.time_span
            .validate(resolver)
            .map_err(|source| ConfigError::TimeSpan {
                expense: self.name.clone(),
                source,
            })
    }

    /// Amount due during `year`
    pub fn value(
        &self,
        year: i32,
        resolver: &dyn LifeEventResolver,
        nb_members: usize,
        correction_factor: f64,
    ) -> Result<f64, TimeSpanError> {
        if !self.time_span.contains(year, resolver)? {
            return Ok(0.0);
        }
        let members = if self.proportional {
            // household sizes are small integers
            nb_members as f64
        } else {
            1.0
        };
        Ok(self.value * correction_factor * members)
    }
}

/// All expenses of the household, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LifeExpenses {
    pub expenses: Vec<LifeExpense>,
}

impl LifeExpenses {
    pub fn validate(&self, resolver: &dyn LifeEventResolver) -> Result<(), ConfigError> {
        self.expenses.iter().try_for_each(|e| e.validate(resolver))
    }

    /// Amounts due during `year`, per expense
    pub fn values(
        &self,
        year: i32,
        resolver: &dyn LifeEventResolver,
        nb_members: usize,
        correction_factor: f64,
    ) -> Result<Vec<(&LifeExpense, f64)>, TimeSpanError> {
        self.expenses
            .iter()
            .map(|e| Ok((e, e.value(year, resolver, nb_members, correction_factor)?)))
            .collect()
    }

    /// Amounts due during `year`, summed per category in report order
    pub fn values_by_category(
        &self,
        year: i32,
        resolver: &dyn LifeEventResolver,
        nb_members: usize,
        correction_factor: f64,
    ) -> Result<Vec<(ExpenseCategory, f64)>, TimeSpanError> {
        let values = self.values(year, resolver, nb_members, correction_factor)?;
        Ok(ExpenseCategory::ALL
            .iter()
            .map(|category| {
                let total = values
                    .iter()
                    .filter(|(e, _)| e.category == *category)
                    .map(|(_, v)| v)
                    .sum();
                (*category, total)
            })
            .collect())
    }
}
