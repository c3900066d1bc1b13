pub mod calculator;
pub mod identifier_cache;
pub mod payment_code;
