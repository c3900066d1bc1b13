use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::{instrument, warn};

use super::crc::compute_crc16;
use super::target::PromptPayTarget;
use super::tlv::{parse_fields, TlvField};
use super::{
    IdKind, InitiationMethod, PromptPayError, PROMPTPAY_AID, SUBTAG_AID, SUBTAG_EWALLET,
    SUBTAG_MOBILE, SUBTAG_NATIONAL_ID, TAG_AMOUNT, TAG_COUNTRY, TAG_CRC, TAG_CURRENCY,
    TAG_FORMAT_INDICATOR, TAG_INITIATION_METHOD, TAG_MERCHANT_ACCOUNT,
};

/// Length of the trailing `6304XXXX`.
const CRC_FIELD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPayload {
    pub format_indicator: String,
    pub initiation: InitiationMethod,
    pub application_id: String,
    pub identifier_tag: String,
    /// Identifier exactly as carried in the merchant account field.
    pub identifier: String,
    /// Mobile numbers in local `0XXXXXXXXX` form, anything else unchanged.
    pub recovered_identifier: String,
    pub id_kind: IdKind,
    pub currency: String,
    pub amount: Option<Decimal>,
    pub country: String,
    pub crc: String,
}

fn required<'a>(fields: &[TlvField<'a>], tag: &str) -> Result<&'a str, PromptPayError> {
    fields
        .iter()
        .find(|field| field.tag == tag)
        .map(|field| field.value)
        .ok_or_else(|| PromptPayError::MissingField(tag.to_string()))
}

fn optional<'a>(fields: &[TlvField<'a>], tag: &str) -> Option<&'a str> {
    fields.iter().find(|field| field.tag == tag).map(|field| field.value)
}

#[instrument(level = "debug", skip_all, fields(len = payload.len()))]
pub fn decode(payload: &str) -> Result<DecodedPayload, PromptPayError> {
    let fields = parse_fields(payload)?;

    let crc_field = fields
        .last()
        .filter(|field| field.tag == TAG_CRC)
        .ok_or_else(|| PromptPayError::MissingField(TAG_CRC.to_string()))?;
    if crc_field.value.len() != 4 {
        return Err(PromptPayError::Malformed(format!(
            "CRC field holds {} characters instead of 4",
            crc_field.value.len()
        )));
    }
    if hex::decode(crc_field.value).is_err() {
        return Err(PromptPayError::Malformed(format!(
            "CRC {:?} is not hexadecimal",
            crc_field.value
        )));
    }

    // parse_fields guarantees ASCII, so byte offsets are char boundaries.
    let covered = &payload[..payload.len() - CRC_FIELD_LEN + 4];
    let expected = compute_crc16(covered);
    if !expected.eq_ignore_ascii_case(crc_field.value) {
        warn!(expected = %expected, found = %crc_field.value, "PromptPay checksum mismatch");
        return Err(PromptPayError::ChecksumMismatch {
            expected,
            found: crc_field.value.to_string(),
        });
    }

    let format_indicator = required(&fields, TAG_FORMAT_INDICATOR)?;
    let initiation_code = required(&fields, TAG_INITIATION_METHOD)?;
    let initiation = InitiationMethod::from_code(initiation_code).ok_or_else(|| {
        PromptPayError::Malformed(format!("unknown initiation method {initiation_code:?}"))
    })?;

    let merchant_fields = parse_fields(required(&fields, TAG_MERCHANT_ACCOUNT)?)?;
    let application_id = required(&merchant_fields, SUBTAG_AID)
        .map_err(|_| PromptPayError::MissingField(format!("{TAG_MERCHANT_ACCOUNT}.{SUBTAG_AID}")))?;
    if application_id != PROMPTPAY_AID {
        return Err(PromptPayError::UnsupportedApplication(
            application_id.to_string(),
        ));
    }

    let identifier_field = merchant_fields
        .iter()
        .find(|field| {
            [SUBTAG_MOBILE, SUBTAG_NATIONAL_ID, SUBTAG_EWALLET].contains(&field.tag)
        })
        .ok_or_else(|| {
            PromptPayError::MissingField(format!("{TAG_MERCHANT_ACCOUNT}.{SUBTAG_MOBILE}"))
        })?;

    let mobile_number = if identifier_field.tag == SUBTAG_MOBILE {
        PromptPayTarget::local_mobile_number(identifier_field.value)
    } else {
        None
    };
    let id_kind = if mobile_number.is_some() {
        IdKind::MobileNumber
    } else {
        IdKind::NationalOrEWalletId
    };

    let amount = optional(&fields, TAG_AMOUNT)
        .map(|value| {
            Decimal::from_str(value)
                .map_err(|err| PromptPayError::Malformed(format!("amount {value:?}: {err}")))
        })
        .transpose()?;

    Ok(DecodedPayload {
        format_indicator: format_indicator.to_string(),
        initiation,
        application_id: application_id.to_string(),
        identifier_tag: identifier_field.tag.to_string(),
        identifier: identifier_field.value.to_string(),
        recovered_identifier: mobile_number
            .unwrap_or_else(|| identifier_field.value.to_string()),
        id_kind,
        currency: required(&fields, TAG_CURRENCY)?.to_string(),
        amount,
        country: required(&fields, TAG_COUNTRY)?.to_string(),
        crc: crc_field.value.to_ascii_uppercase(),
    })
}

/// True when `payload` parses, carries a matching CRC and names PromptPay.
pub fn validate(payload: &str) -> bool {
    decode(payload).is_ok()
}
