//! Salary, expenses and the monthly statement built from them.

use rust_decimal::Decimal;
use thiserror::Error;

mod models;
mod statement;

pub use models::{BudgetState, CategoryShare, Expense, ExpenseCategory, HistoricalBudget};
pub use statement::{Receipt, Statement};

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("expense amount {0} is negative")]
    NegativeAmount(Decimal),

    #[error("budget totals are out of range")]
    Overflow,

    #[error("invalid budget file")]
    Json(#[from] serde_json::Error),

    #[error("failed to read budget file")]
    Io(#[from] std::io::Error),
}
