//! Life expenses and the time spans they are due in

mod life_expense;
mod time_span;

pub use life_expense::{ExpenseCategory, LifeExpense, LifeExpenses};
pub use time_span::{DateBoundary, GroupOrder, TimeSpan};
