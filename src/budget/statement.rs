use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use super::models::{BudgetState, Expense};
use super::BudgetError;
use crate::promptpay::{PromptPayEncoder, PromptPayError};
use crate::utils::helpers::format_baht;

const WIDTH: usize = 44;

/// Monthly statement: income, fixed bills, variable spending and what is left.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub id: Uuid,
    pub income: Decimal,
    pub bills: Vec<Expense>,
    pub variable: Vec<Expense>,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
}

impl Statement {
    pub fn from_budget(budget: &BudgetState) -> Result<Self, BudgetError> {
        let (bills, variable): (Vec<Expense>, Vec<Expense>) = budget
            .expenses
            .iter()
            .cloned()
            .partition(|expense| expense.category.is_fixed_bill());

        Ok(Statement {
            id: Uuid::new_v4(),
            income: budget.salary,
            bills,
            variable,
            total_expenses: budget.total_expenses()?,
            net_balance: budget.remaining()?,
        })
    }

    pub fn is_overspent(&self) -> bool {
        self.net_balance < Decimal::ZERO
    }

    /// Payment code asking for the month's total expenses.
    pub fn payment_code(
        &self,
        encoder: &PromptPayEncoder,
        identifier: &str,
    ) -> Result<String, PromptPayError> {
        encoder.encode(identifier, self.total_expenses)
    }

    pub fn receipt(&self, generated_at: DateTime<Utc>) -> Receipt<'_> {
        Receipt {
            statement: self,
            generated_at,
        }
    }

    pub fn render(&self, generated_at: DateTime<Utc>) -> String {
        self.receipt(generated_at).to_string()
    }
}

/// Fixed-width text rendering of a [`Statement`].
pub struct Receipt<'a> {
    statement: &'a Statement,
    generated_at: DateTime<Utc>,
}

impl fmt::Display for Receipt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let statement = self.statement;
        let rule = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);
        let short_id = statement.id.simple().to_string()[..8].to_ascii_uppercase();

        writeln!(f, "{:^WIDTH$}", "MONTHLY STATEMENT")?;
        writeln!(f, "{:^WIDTH$}", format!("ID: {short_id}"))?;
        writeln!(
            f,
            "{:^WIDTH$}",
            self.generated_at.format("%d %B %Y %H:%M").to_string()
        )?;
        writeln!(f, "{rule}")?;
        line(f, "TOTAL INCOME", statement.income)?;

        section(f, "Fix Monthly Bills (รายการบิลประจำ)", "●", &statement.bills)?;
        section(f, "Variable Expenses (ค่าใช้จ่ายอื่นๆ)", "○", &statement.variable)?;

        writeln!(f, "{thin}")?;
        line(f, "TOTAL EXPENSES", statement.total_expenses)?;
        writeln!(f, "{rule}")?;
        line(f, "NET BALANCE", statement.net_balance)?;
        if statement.is_overspent() {
            writeln!(f, "** OVERSPENT **")?;
        }

        Ok(())
    }
}

fn line(f: &mut fmt::Formatter<'_>, label: &str, amount: Decimal) -> fmt::Result {
    let amount = format_baht(amount);
    let pad = WIDTH.saturating_sub(label.chars().count() + amount.chars().count());
    writeln!(f, "{label}{}{amount}", " ".repeat(pad.max(1)))
}

fn section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    bullet: &str,
    expenses: &[Expense],
) -> fmt::Result {
    if expenses.is_empty() {
        return Ok(());
    }

    writeln!(f)?;
    writeln!(f, "{title}")?;
    for expense in expenses {
        line(f, &format!("{bullet} {}", expense.description), expense.amount)?;
    }
    Ok(())
}
