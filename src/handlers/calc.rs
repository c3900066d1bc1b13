use anyhow::{Context, Result};
use clap::Args;
use tracing::instrument;

use crate::service::calculator::evaluate;

#[derive(Debug, Args)]
pub struct CalcArgs {
    /// Expression such as "1500 x 3 - 200"
    #[arg(num_args = 1.., allow_hyphen_values = true)]
    pub expression: Vec<String>,
}

#[instrument(skip_all)]
pub fn execute(args: CalcArgs) -> Result<()> {
    let expression = args.expression.join(" ");
    let value = evaluate(&expression).with_context(|| format!("cannot evaluate {expression:?}"))?;
    println!("{value}");
    Ok(())
}
