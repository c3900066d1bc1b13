use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use tracing::{debug, instrument};

use super::crc::compute_crc16;
use super::target::PromptPayTarget;
use super::tlv::{encode_field, MAX_VALUE_LEN};
use super::{
    InitiationMethod, PromptPayError, COUNTRY_TH, CURRENCY_THB, FORMAT_INDICATOR, PROMPTPAY_AID,
    SUBTAG_AID, SUBTAG_MOBILE, TAG_AMOUNT, TAG_COUNTRY, TAG_CRC, TAG_CURRENCY,
    TAG_FORMAT_INDICATOR, TAG_INITIATION_METHOD, TAG_MERCHANT_ACCOUNT,
};

/// Tag 54 carries at most 13 characters.
const MAX_AMOUNT_LEN: usize = 13;
/// The AID sub-field (`0016` + AID) and the identifier sub-field header share
/// the 99 bytes of tag 29 with the identifier itself.
const MAX_IDENTIFIER_LEN: usize = MAX_VALUE_LEN - (4 + PROMPTPAY_AID.len()) - 4;

/// How tag `01` is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitiationPolicy {
    /// Always `11`, whether or not an amount is embedded. Many banking apps
    /// and generators emit this.
    #[default]
    AlwaysStatic,
    /// `12` when an amount is embedded, `11` otherwise.
    DynamicWhenAmount,
}

impl InitiationPolicy {
    pub fn method_for(&self, has_amount: bool) -> InitiationMethod {
        match self {
            InitiationPolicy::DynamicWhenAmount if has_amount => InitiationMethod::Dynamic,
            _ => InitiationMethod::Static,
        }
    }
}

impl FromStr for InitiationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "11" => Ok(InitiationPolicy::AlwaysStatic),
            "dynamic" | "12" => Ok(InitiationPolicy::DynamicWhenAmount),
            other => Err(format!(
                "unknown initiation policy {other:?}, expected \"static\" or \"dynamic\""
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptPayEncoder {
    policy: InitiationPolicy,
}

impl PromptPayEncoder {
    pub fn new(policy: InitiationPolicy) -> Self {
        PromptPayEncoder { policy }
    }

    pub fn policy(&self) -> InitiationPolicy {
        self.policy
    }

    /// Builds the complete payload, CRC included. An amount that rounds to
    /// zero produces a static code where the payer types the amount.
    #[instrument(level = "debug", skip_all, fields(policy = ?self.policy, amount = %amount))]
    pub fn encode(&self, identifier: &str, amount: Decimal) -> Result<String, PromptPayError> {
        let formatted_id = build_identifier_field(identifier)?;
        let merchant_account = build_merchant_account_field(&formatted_id)?;
        let amount_field = build_amount_field(amount)?;
        let initiation = self.policy.method_for(amount_field.is_some());

        let mut payload = String::with_capacity(128);
        payload.push_str(&encode_field(TAG_FORMAT_INDICATOR, FORMAT_INDICATOR)?);
        payload.push_str(&encode_field(TAG_INITIATION_METHOD, initiation.code())?);
        payload.push_str(&merchant_account);
        payload.push_str(&encode_field(TAG_CURRENCY, CURRENCY_THB)?);
        if let Some(amount_field) = amount_field {
            payload.push_str(&amount_field);
        }
        payload.push_str(&encode_field(TAG_COUNTRY, COUNTRY_TH)?);
        payload.push_str(TAG_CRC);
        payload.push_str("04");

        let crc = compute_crc16(&payload);
        payload.push_str(&crc);

        debug!(len = payload.len(), crc = %crc, "PromptPay payload built");
        Ok(payload)
    }

    pub fn encode_f64(&self, identifier: &str, amount: f64) -> Result<String, PromptPayError> {
        self.encode(identifier, amount_from_f64(amount)?)
    }
}

/// Encodes with the default [`InitiationPolicy::AlwaysStatic`].
pub fn encode(identifier: &str, amount: Decimal) -> Result<String, PromptPayError> {
    PromptPayEncoder::default().encode(identifier, amount)
}

pub fn amount_from_f64(amount: f64) -> Result<Decimal, PromptPayError> {
    if !amount.is_finite() {
        return Err(PromptPayError::InvalidAmount(format!(
            "{amount} is not a finite number"
        )));
    }

    Decimal::from_f64(amount)
        .ok_or_else(|| PromptPayError::InvalidAmount(format!("{amount} is out of range")))
}

pub fn build_identifier_field(raw_identifier: &str) -> Result<String, PromptPayError> {
    let formatted = PromptPayTarget::parse(raw_identifier)?.formatted_id();
    if formatted.len() > MAX_IDENTIFIER_LEN {
        return Err(PromptPayError::InvalidIdentifier(format!(
            "{} digits is longer than the {MAX_IDENTIFIER_LEN} a merchant account field can hold",
            formatted.len()
        )));
    }

    Ok(formatted)
}

pub fn build_merchant_account_field(formatted_id: &str) -> Result<String, PromptPayError> {
    let mut inner = encode_field(SUBTAG_AID, PROMPTPAY_AID)?;
    inner.push_str(&encode_field(SUBTAG_MOBILE, formatted_id)?);

    encode_field(TAG_MERCHANT_ACCOUNT, &inner)
}

/// Rounds half-up to satang precision. `None` means the field is omitted.
pub fn build_amount_field(amount: Decimal) -> Result<Option<String>, PromptPayError> {
    if amount < Decimal::ZERO {
        return Err(PromptPayError::InvalidAmount(format!(
            "{amount} is negative"
        )));
    }

    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return Ok(None);
    }
    rounded.rescale(2);

    let value = rounded.to_string();
    if value.len() > MAX_AMOUNT_LEN {
        return Err(PromptPayError::InvalidAmount(format!(
            "{value} exceeds {MAX_AMOUNT_LEN} characters"
        )));
    }

    encode_field(TAG_AMOUNT, &value).map(Some)
}
