use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::BudgetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    #[serde(alias = "ที่อยู่อาศัย/ค่าเช่า")]
    Housing,
    #[serde(alias = "อาหารและเครื่องดื่ม")]
    Food,
    #[serde(alias = "การเดินทาง/น้ำมัน")]
    Transport,
    #[serde(alias = "ผ่อนรถ/มอเตอร์ไซค์")]
    VehicleLoan,
    #[serde(alias = "ชำระบัตรเครดิต")]
    CreditCard,
    #[serde(alias = "ค่าน้ำ/ค่าไฟ")]
    Utilities,
    #[serde(alias = "ค่าเน็ต/โทรศัพท์")]
    Communication,
    #[serde(alias = "ความบันเทิง/สตรีมมิ่ง")]
    Entertainment,
    #[serde(alias = "ตั๋วเครื่องบิน/ท่องเที่ยว")]
    Flights,
    #[serde(alias = "ช้อปปิ้ง/ของใช้")]
    Shopping,
    #[serde(alias = "สุขภาพ/ประกัน")]
    Health,
    #[serde(alias = "เงินออม/ลงทุน")]
    Savings,
    #[serde(alias = "อื่นๆ")]
    Others,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 13] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::VehicleLoan,
        ExpenseCategory::CreditCard,
        ExpenseCategory::Utilities,
        ExpenseCategory::Communication,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Flights,
        ExpenseCategory::Shopping,
        ExpenseCategory::Health,
        ExpenseCategory::Savings,
        ExpenseCategory::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "ที่อยู่อาศัย/ค่าเช่า",
            ExpenseCategory::Food => "อาหารและเครื่องดื่ม",
            ExpenseCategory::Transport => "การเดินทาง/น้ำมัน",
            ExpenseCategory::VehicleLoan => "ผ่อนรถ/มอเตอร์ไซค์",
            ExpenseCategory::CreditCard => "ชำระบัตรเครดิต",
            ExpenseCategory::Utilities => "ค่าน้ำ/ค่าไฟ",
            ExpenseCategory::Communication => "ค่าเน็ต/โทรศัพท์",
            ExpenseCategory::Entertainment => "ความบันเทิง/สตรีมมิ่ง",
            ExpenseCategory::Flights => "ตั๋วเครื่องบิน/ท่องเที่ยว",
            ExpenseCategory::Shopping => "ช้อปปิ้ง/ของใช้",
            ExpenseCategory::Health => "สุขภาพ/ประกัน",
            ExpenseCategory::Savings => "เงินออม/ลงทุน",
            ExpenseCategory::Others => "อื่นๆ",
        }
    }

    /// Recurring monthly obligations, listed apart on statements.
    pub fn is_fixed_bill(&self) -> bool {
        matches!(
            self,
            ExpenseCategory::Housing
                | ExpenseCategory::VehicleLoan
                | ExpenseCategory::CreditCard
                | ExpenseCategory::Utilities
                | ExpenseCategory::Communication
        )
    }
}

/// Records store ids as opaque strings; new expenses get a v4 UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub description: String,
    #[serde(deserialize_with = "record_date::deserialize")]
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        category: ExpenseCategory,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, BudgetError> {
        if amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount(amount));
        }

        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            category,
            amount,
            description: description.into(),
            date,
        })
    }
}

/// Expense dates are written as `YYYY-MM-DD`. Older records carry the
/// th-TH locale form `d/m/yyyy` with a Buddhist-era year.
mod record_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer};

    const BUDDHIST_ERA_OFFSET: i32 = 543;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised date {raw:?}")))
    }

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }

        let mut parts = raw.split('/').map(|part| part.trim().parse::<i32>().ok());
        let (day, month, year) = (parts.next()??, parts.next()??, parts.next()??);
        if parts.next().is_some() {
            return None;
        }
        let year = if year > 2400 {
            year - BUDDHIST_ERA_OFFSET
        } else {
            year
        };

        NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: ExpenseCategory,
    pub total: Decimal,
    /// Share of all expenses, one decimal place.
    pub percent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetState {
    pub salary: Decimal,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl BudgetState {
    pub fn new(salary: Decimal) -> Self {
        BudgetState {
            salary,
            expenses: Vec::new(),
        }
    }

    /// Rejects negative amounts and totals too large to compute.
    pub fn from_json(json: &str) -> Result<Self, BudgetError> {
        let state: BudgetState = serde_json::from_str(json)?;
        if let Some(expense) = state.expenses.iter().find(|e| e.amount < Decimal::ZERO) {
            return Err(BudgetError::NegativeAmount(expense.amount));
        }
        state.remaining()?;
        Ok(state)
    }

    pub fn to_json_pretty(&self) -> Result<String, BudgetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Newest first, as the expense list is shown.
    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.insert(0, expense);
    }

    pub fn remove_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|expense| expense.id != id);
        self.expenses.len() != before
    }

    pub fn total_expenses(&self) -> Result<Decimal, BudgetError> {
        self.expenses
            .iter()
            .try_fold(Decimal::ZERO, |total, expense| total.checked_add(expense.amount))
            .ok_or(BudgetError::Overflow)
    }

    /// Salary left after expenses; negative when overspent.
    pub fn remaining(&self) -> Result<Decimal, BudgetError> {
        self.salary
            .checked_sub(self.total_expenses()?)
            .ok_or(BudgetError::Overflow)
    }

    /// Per-category totals, largest first. Categories without spending are
    /// left out.
    pub fn category_breakdown(&self) -> Result<Vec<CategoryShare>, BudgetError> {
        let total = self.total_expenses()?;
        if total.is_zero() {
            return Ok(Vec::new());
        }

        // each category sum is bounded by the checked total
        let mut by_category: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
        for expense in &self.expenses {
            *by_category.entry(expense.category).or_default() += expense.amount;
        }

        let mut shares = by_category
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(category, amount)| {
                let percent = amount
                    .checked_div(total)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or(BudgetError::Overflow)?
                    .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
                Ok(CategoryShare {
                    category,
                    total: amount,
                    percent,
                })
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;
        shares.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(shares)
    }

    pub fn top_categories(&self, n: usize) -> Result<Vec<CategoryShare>, BudgetError> {
        let mut shares = self.category_breakdown()?;
        shares.truncate(n);
        Ok(shares)
    }
}

/// A month's budget frozen at the time it was archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBudget {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    pub month_name: String,
    #[serde(flatten)]
    pub budget: BudgetState,
}

impl HistoricalBudget {
    pub fn snapshot(budget: &BudgetState, saved_at: DateTime<Utc>) -> Self {
        HistoricalBudget {
            id: Uuid::new_v4().to_string(),
            saved_at,
            month_name: saved_at.format("%B %Y").to_string(),
            budget: budget.clone(),
        }
    }
}
