use super::{IdKind, PromptPayError};
use crate::utils::helpers::digits_only;

/// Length of a Thai mobile number including the trunk prefix `0`.
const MOBILE_NUMBER_LEN: usize = 10;
/// `00` padding followed by the Thai country calling code.
const MOBILE_COUNTRY_PREFIX: &str = "0066";

/// A payee as typed by the user, plus its digits-only form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayTarget {
    raw_identifier: String,
    normalized_id: String,
}

impl PromptPayTarget {
    pub fn parse(raw_identifier: &str) -> Result<Self, PromptPayError> {
        let normalized_id = digits_only(raw_identifier);
        if normalized_id.is_empty() {
            return Err(PromptPayError::InvalidIdentifier(format!(
                "{raw_identifier:?} contains no digits"
            )));
        }

        Ok(PromptPayTarget {
            raw_identifier: raw_identifier.to_string(),
            normalized_id,
        })
    }

    pub fn raw_identifier(&self) -> &str {
        &self.raw_identifier
    }

    pub fn normalized_id(&self) -> &str {
        &self.normalized_id
    }

    pub fn id_kind(&self) -> IdKind {
        if self.normalized_id.len() == MOBILE_NUMBER_LEN {
            IdKind::MobileNumber
        } else {
            IdKind::NationalOrEWalletId
        }
    }

    /// Identifier as carried inside the merchant account field.
    ///
    /// Mobile numbers drop the trunk `0` and gain the `0066` prefix, so
    /// `0812345678` becomes `0066812345678`. Everything else passes through.
    pub fn formatted_id(&self) -> String {
        match self.id_kind() {
            IdKind::MobileNumber => format!("{MOBILE_COUNTRY_PREFIX}{}", &self.normalized_id[1..]),
            IdKind::NationalOrEWalletId => self.normalized_id.clone(),
        }
    }

    /// Inverse of [`formatted_id`](Self::formatted_id) for mobile numbers.
    pub(crate) fn local_mobile_number(formatted: &str) -> Option<String> {
        let national = formatted.strip_prefix(MOBILE_COUNTRY_PREFIX)?;
        (national.len() == MOBILE_NUMBER_LEN - 1 && national.bytes().all(|b| b.is_ascii_digit()))
            .then(|| format!("0{national}"))
    }
}
