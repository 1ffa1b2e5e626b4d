//! Yearly balance sheets and cash flows of one run

use serde::{Deserialize, Serialize};

use crate::succession::{MissingCapital, Succession};

/// Key of household-wide values in per-person tables
pub const ALL_PERSONS: &str = "all persons";
/// Key of the sum over the adults in per-person tables
pub const ALL_ADULTS: &str = "all adults";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

/// Values of one category, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedValueTable {
    pub name: String,
    pub values: Vec<NamedValue>,
}

impl NamedValueTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Adds to the value named `name`, creating it at the end if needed
    pub fn add(&mut self, name: &str, value: f64) {
        match self.values.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.value += value,
            None => self.values.push(NamedValue {
                name: name.to_string(),
                value,
            }),
        }
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.add(name, value);
        self
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().map(|v| v.value).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A year record made of categories of named values
pub trait YearRecord {
    fn year(&self) -> i32;

    /// Categories in declaration order
    fn categories(&self) -> Vec<&NamedValueTable>;
}

/// Assets and liabilities at the end of a year.
///
/// Liabilities are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetLine {
    pub year: i32,
    pub assets: Vec<NamedValueTable>,
    pub liabilities: Vec<NamedValueTable>,
    /// Net worth held by each family member, plus [`ALL_ADULTS`] and [`ALL_PERSONS`]
    pub net_worth: NamedValueTable,
}

impl BalanceSheetLine {
    #[must_use]
    pub fn assets_total(&self) -> f64 {
        self.assets.iter().map(NamedValueTable::total).sum()
    }

    #[must_use]
    pub fn liabilities_total(&self) -> f64 {
        self.liabilities.iter().map(NamedValueTable::total).sum()
    }

    #[must_use]
    pub fn net_total(&self) -> f64 {
        self.assets_total() + self.liabilities_total()
    }

    #[must_use]
    pub fn net_worth_of(&self, name: &str) -> f64 {
        self.net_worth.value(name).unwrap_or(0.0)
    }
}

impl YearRecord for BalanceSheetLine {
    fn year(&self) -> i32 {
        self.year
    }

    fn categories(&self) -> Vec<&NamedValueTable> {
        self.assets.iter().chain(&self.liabilities).collect()
    }
}

/// Money received and spent during a year.
///
/// Inflows are positive and outflows negative, so the total over every
/// category is zero when the year is funded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowLine {
    pub year: i32,
    /// Work income, unemployment, pensions, rents, sales...
    pub revenues: Vec<NamedValueTable>,
    pub taxes: NamedValueTable,
    pub expenses: NamedValueTable,
    pub debt_payments: NamedValueTable,
    /// Periodic payments and purchases
    pub investments: NamedValueTable,
    /// Deposits (negative) and net withdrawals (positive) on free investments
    pub free_investments: NamedValueTable,
    /// Taxes on the gains withdrawn, included in the withdrawals
    pub withdrawal_taxes: f64,
    /// Taxable income declared for the income tax
    pub taxable_income: f64,
}

impl CashFlowLine {
    #[must_use]
    pub fn revenues_total(&self) -> f64 {
        self.revenues.iter().map(NamedValueTable::total).sum()
    }

    /// Balance before the free investments are used
    #[must_use]
    pub fn net_cash_flow(&self) -> f64 {
        self.revenues_total()
            + self.taxes.total()
            + self.expenses.total()
            + self.debt_payments.total()
            + self.investments.total()
    }

    /// What remains once deposits and withdrawals are made; negative when
    /// the deficit could not be funded
    #[must_use]
    pub fn unfunded(&self) -> f64 {
        self.net_cash_flow() + self.free_investments.total()
    }
}

impl YearRecord for CashFlowLine {
    fn year(&self) -> i32 {
        self.year
    }

    fn categories(&self) -> Vec<&NamedValueTable> {
        self.revenues
            .iter()
            .chain([
                &self.taxes,
                &self.expenses,
                &self.debt_payments,
                &self.investments,
                &self.free_investments,
            ])
            .collect()
    }
}

/// Time series of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialAccounts {
    pub balance_sheets: Vec<BalanceSheetLine>,
    pub cash_flows: Vec<CashFlowLine>,
    pub successions: Vec<Succession>,
    pub missing_capital: Vec<MissingCapital>,
}

impl SocialAccounts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balance_sheets.is_empty()
    }

    #[must_use]
    pub fn balance_sheet(&self, year: i32) -> Option<&BalanceSheetLine> {
        self.balance_sheets.iter().find(|l| l.year == year)
    }

    #[must_use]
    pub fn cash_flow(&self, year: i32) -> Option<&CashFlowLine> {
        self.cash_flows.iter().find(|l| l.year == year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_accumulates_in_order() {
        let mut table = NamedValueTable::new("Pensions");
        table.add("Vanessa", 10.0);
        table.add("Lionel", 5.0);
        table.add("Vanessa", 2.5);
        assert_eq!(table.values[0].name, "Vanessa");
        assert_eq!(table.value("Vanessa"), Some(12.5));
        assert_eq!(table.value("Arthur"), None);
        assert_eq!(table.total(), 17.5);
    }

    #[test]
    fn test_cash_flow_balance() {
        let line = CashFlowLine {
            year: 2030,
            revenues: vec![NamedValueTable::new("Work income").with("Lionel", 40_000.0)],
            taxes: NamedValueTable::new("Taxes").with("Income tax", -3_000.0),
            expenses: NamedValueTable::new("Expenses").with("Daily life", -45_000.0),
            debt_payments: NamedValueTable::new("Debt payments"),
            investments: NamedValueTable::new("Investments"),
            free_investments: NamedValueTable::new("Free investments").with("Savings", 8_000.0),
            withdrawal_taxes: 0.0,
            taxable_income: 36_000.0,
        };
        assert_eq!(line.net_cash_flow(), -8_000.0);
        assert_eq!(line.unfunded(), 0.0);
        assert_eq!(line.categories().len(), 6);
    }

    #[test]
    fn test_balance_sheet_totals() {
        let line = BalanceSheetLine {
            year: 2030,
            assets: vec![NamedValueTable::new("Real estate").with("House", 300_000.0)],
            liabilities: vec![NamedValueTable::new("Loans").with("Mortgage", -50_000.0)],
            net_worth: NamedValueTable::new("Net worth").with(ALL_PERSONS, 250_000.0),
        };
        assert_eq!(line.net_total(), 250_000.0);
        assert_eq!(line.net_worth_of(ALL_PERSONS), 250_000.0);
        assert_eq!(line.net_worth_of("Lionel"), 0.0);
    }
}
