use anyhow::{anyhow, Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{error, instrument};
use validator::Validate;

use crate::dto::payment_code::PaymentCodeBody;
use crate::promptpay::{decode, InitiationPolicy, PromptPayEncoder};
use crate::service::identifier_cache::FileIdentifierCache;
use crate::service::payment_code::PaymentCodeService;
use crate::utils::config::EnvConfig;

#[derive(Debug, Args)]
pub struct QrArgs {
    /// Phone number, national ID or e-wallet ID; the last one used if omitted
    pub identifier: Option<String>,

    /// Amount in Baht; zero lets the payer enter it
    #[arg(short, long, default_value = "0")]
    pub amount: Decimal,

    /// Mark codes that carry an amount as dynamic (initiation method 12)
    #[arg(long)]
    pub dynamic: bool,

    /// Print payload and decoded fields as JSON
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip_all, fields(amount = %args.amount))]
pub fn execute(config: &EnvConfig, args: QrArgs) -> Result<()> {
    let body = PaymentCodeBody {
        identifier: args.identifier,
        amount: args.amount,
    };
    if let Err(err) = body.validate() {
        error!("Validation errors ===> {}", err);
        return Err(anyhow!("cannot generate payment code: {err}"));
    }

    let policy = if args.dynamic {
        InitiationPolicy::DynamicWhenAmount
    } else {
        config.initiation_policy
    };
    let mut service = PaymentCodeService::new(
        PromptPayEncoder::new(policy),
        FileIdentifierCache::new(&config.identifier_cache_path),
        config.default_promptpay_id.clone(),
    );

    let code = match service.generate(body.identifier.as_deref(), body.amount) {
        Ok(code) => code,
        Err(err) => {
            error!("Error generating payment code ===> {}", err);
            return Err(anyhow!(err).context("cannot generate payment code"));
        }
    };

    if args.json {
        let decoded = decode(&code.payload).context("generated payload failed to decode")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "payload": code.payload, "fields": decoded }))?
        );
    } else {
        println!("{}", code.payload);
    }

    Ok(())
}
