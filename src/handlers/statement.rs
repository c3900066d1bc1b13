use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::budget::{BudgetError, BudgetState, Statement};
use crate::promptpay::PromptPayEncoder;
use crate::utils::config::EnvConfig;
use crate::utils::helpers::format_baht;

#[derive(Debug, Args)]
pub struct StatementArgs {
    /// Budget JSON file: { "salary": ..., "expenses": [...] }
    pub file: PathBuf,

    /// Also print a payment code for the total expenses
    #[arg(long)]
    pub promptpay: Option<String>,

    /// Number of categories to list in the breakdown
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

fn load_budget(path: &Path) -> Result<BudgetState, BudgetError> {
    let json = fs::read_to_string(path)?;
    BudgetState::from_json(&json)
}

#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn execute(config: &EnvConfig, args: StatementArgs) -> Result<()> {
    let budget = load_budget(&args.file)
        .with_context(|| format!("cannot load budget from {}", args.file.display()))?;
    info!(expenses = budget.expenses.len(), "Budget loaded");

    let statement = Statement::from_budget(&budget)
        .with_context(|| format!("cannot total budget from {}", args.file.display()))?;
    print!("{}", statement.receipt(Utc::now()));

    let shares = budget.top_categories(args.top)?;
    if !shares.is_empty() {
        println!();
        println!("Top categories");
        for share in shares {
            println!(
                "  {:<28} {:>14} {:>6}%",
                share.category.label(),
                format_baht(share.total),
                share.percent
            );
        }
    }

    if let Some(identifier) = args.promptpay.as_deref() {
        let encoder = PromptPayEncoder::new(config.initiation_policy);
        let payload = statement
            .payment_code(&encoder, identifier)
            .context("cannot generate payment code")?;
        println!();
        println!("PromptPay: {payload}");
    }

    Ok(())
}
