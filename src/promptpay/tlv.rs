//! Two-digit tag, two-digit length, value.

use super::PromptPayError;

/// Largest value a two-digit length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// A parsed field borrowing from the payload it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvField<'a> {
    pub tag: &'a str,
    pub value: &'a str,
}

pub fn encode_field(tag: &str, value: &str) -> Result<String, PromptPayError> {
    if value.len() > MAX_VALUE_LEN {
        return Err(PromptPayError::FieldTooLong {
            tag: tag.to_string(),
            len: value.len(),
        });
    }

    Ok(format!("{tag}{:02}{value}", value.len()))
}

pub fn parse_fields(input: &str) -> Result<Vec<TlvField<'_>>, PromptPayError> {
    if !input.is_ascii() {
        return Err(PromptPayError::NonAscii);
    }

    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let header = input.get(pos..pos + 4).ok_or_else(|| {
            PromptPayError::Malformed(format!("truncated field header at offset {pos}"))
        })?;
        let (tag, len) = header.split_at(2);

        if !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PromptPayError::Malformed(format!(
                "field {tag} has non-numeric length {len:?}"
            )));
        }
        let len: usize = len
            .parse()
            .map_err(|_| PromptPayError::Malformed(format!("field {tag} length {len:?}")))?;

        let start = pos + 4;
        let value = input.get(start..start + len).ok_or_else(|| {
            PromptPayError::Malformed(format!(
                "field {tag} declares {len} bytes but only {} remain",
                input.len() - start
            ))
        })?;

        fields.push(TlvField { tag, value });
        pos = start + len;
    }

    Ok(fields)
}
