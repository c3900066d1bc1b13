pub mod calc;
pub mod decode;
pub mod qr;
pub mod statement;
