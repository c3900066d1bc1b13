use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::promptpay::{PromptPayEncoder, PromptPayError};

use super::identifier_cache::IdentifierCache;

#[derive(Error, Debug)]
pub enum PaymentCodeError {
    #[error("no PromptPay identifier given and none remembered")]
    MissingIdentifier,

    #[error(transparent)]
    PromptPay(#[from] PromptPayError),

    #[error("failed to read remembered identifier")]
    Cache(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentCode {
    pub identifier: String,
    pub amount: Decimal,
    pub payload: String,
}

/// Resolves which identifier to bill to, encodes the payload and remembers
/// the identifier once a code was produced.
pub struct PaymentCodeService<C: IdentifierCache> {
    encoder: PromptPayEncoder,
    cache: C,
    fallback_identifier: Option<String>,
}

impl<C: IdentifierCache> PaymentCodeService<C> {
    pub fn new(encoder: PromptPayEncoder, cache: C, fallback_identifier: Option<String>) -> Self {
        PaymentCodeService {
            encoder,
            cache,
            fallback_identifier,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Explicit identifier first, then the remembered one, then the configured default.
    pub fn resolve_identifier(&self, identifier: Option<&str>) -> Result<String, PaymentCodeError> {
        if let Some(identifier) = identifier.map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(identifier.to_string());
        }

        if let Some(remembered) = self.cache.load()? {
            return Ok(remembered);
        }

        self.fallback_identifier
            .clone()
            .ok_or(PaymentCodeError::MissingIdentifier)
    }

    #[instrument(skip(self, identifier), fields(amount = %amount))]
    pub fn generate(
        &mut self,
        identifier: Option<&str>,
        amount: Decimal,
    ) -> Result<PaymentCode, PaymentCodeError> {
        let identifier = self.resolve_identifier(identifier)?;
        let payload = self.encoder.encode(&identifier, amount)?;

        if let Err(err) = self.cache.store(&identifier) {
            warn!("Failed to remember PromptPay identifier: {}", err);
        }

        info!("Generated PromptPay payment code");
        Ok(PaymentCode {
            identifier,
            amount,
            payload,
        })
    }
}
