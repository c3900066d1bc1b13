use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        let mut err = ValidationError::new("negative_amount");
        err.message = Some("Amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Deserialize, Validate, Debug)]
pub struct PaymentCodeBody {
    #[validate(length(min = 1, max = 100, message = "PromptPay ID must be 1 to 100 characters"))]
    pub identifier: Option<String>,

    #[validate(custom = "validate_amount")]
    pub amount: Decimal, // Amount in Baht, zero for a code without amount
}

#[derive(Deserialize, Validate, Debug)]
pub struct DecodeBody {
    #[validate(length(min = 8, max = 512, message = "Payload must be 8 to 512 characters"))]
    pub payload: String,
}
