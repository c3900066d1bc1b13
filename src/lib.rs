pub mod budget;
pub mod dto;
pub mod handlers;
pub mod promptpay;
pub mod service;
pub mod utils;
