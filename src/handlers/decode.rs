use anyhow::{anyhow, Result};
use clap::Args;
use tracing::{error, info, instrument};
use validator::Validate;

use crate::dto::payment_code::DecodeBody;
use crate::promptpay::decode;
use crate::utils::helpers::format_baht;

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Payload text as read from a QR code
    pub payload: String,

    /// Print the decoded fields as JSON
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip_all)]
pub fn execute(args: DecodeArgs) -> Result<()> {
    let body = DecodeBody {
        payload: args.payload.trim().to_string(),
    };
    if let Err(err) = body.validate() {
        error!("Validation errors ===> {}", err);
        return Err(anyhow!("invalid payload: {err}"));
    }

    let decoded = match decode(&body.payload) {
        Ok(decoded) => decoded,
        Err(err) => {
            error!("Error decoding payload ===> {}", err);
            return Err(anyhow!(err).context("invalid payload"));
        }
    };
    info!(crc = %decoded.crc, "Payload decoded");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    println!("Identifier : {}", decoded.recovered_identifier);
    println!("Kind       : {:?}", decoded.id_kind);
    println!("Initiation : {:?}", decoded.initiation);
    match decoded.amount {
        Some(amount) => println!("Amount     : {}", format_baht(amount)),
        None => println!("Amount     : (entered by payer)"),
    }
    println!("Currency   : {}", decoded.currency);
    println!("Country    : {}", decoded.country);
    println!("CRC        : {}", decoded.crc);

    Ok(())
}
