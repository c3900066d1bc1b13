//! PromptPay EMV-QR payloads (merchant presented mode).
//!
//! [`PromptPayEncoder`] turns a payee identifier and an amount into the text
//! a QR renderer needs; [`decode`] parses such a payload back and checks its
//! CRC.

use serde::Serialize;
use thiserror::Error;

mod crc;
mod decoder;
mod encoder;
mod target;
mod tlv;

pub use crc::{compute_crc16, crc16_ccitt_false};
pub use decoder::{decode, validate, DecodedPayload};
pub use encoder::{
    amount_from_f64, build_amount_field, build_identifier_field, build_merchant_account_field,
    encode, InitiationPolicy, PromptPayEncoder,
};
pub use target::PromptPayTarget;
pub use tlv::{encode_field, parse_fields, TlvField};

/// Application identifier of the PromptPay scheme.
pub const PROMPTPAY_AID: &str = "A000000677010111";

pub const TAG_FORMAT_INDICATOR: &str = "00";
pub const TAG_INITIATION_METHOD: &str = "01";
pub const TAG_MERCHANT_ACCOUNT: &str = "29";
pub const TAG_CURRENCY: &str = "53";
pub const TAG_AMOUNT: &str = "54";
pub const TAG_COUNTRY: &str = "58";
pub const TAG_CRC: &str = "63";

pub const SUBTAG_AID: &str = "00";
pub const SUBTAG_MOBILE: &str = "01";
pub const SUBTAG_NATIONAL_ID: &str = "02";
pub const SUBTAG_EWALLET: &str = "03";

pub const FORMAT_INDICATOR: &str = "01";
/// ISO 4217 numeric code for Thai Baht.
pub const CURRENCY_THB: &str = "764";
pub const COUNTRY_TH: &str = "TH";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptPayError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("field {tag} value is {len} bytes, a TLV field holds at most 99")]
    FieldTooLong { tag: String, len: usize },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("payload is missing field {0}")]
    MissingField(String),

    #[error("unsupported application id {0}")]
    UnsupportedApplication(String),

    #[error("checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("payload contains non-ASCII characters")]
    NonAscii,
}

/// What kind of PromptPay proxy an identifier is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    MobileNumber,
    NationalOrEWalletId,
}

/// Point of Initiation Method (tag `01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiationMethod {
    Static,
    Dynamic,
}

impl InitiationMethod {
    pub fn code(&self) -> &'static str {
        match self {
            InitiationMethod::Static => "11",
            InitiationMethod::Dynamic => "12",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "11" => Some(InitiationMethod::Static),
            "12" => Some(InitiationMethod::Dynamic),
            _ => None,
        }
    }
}
