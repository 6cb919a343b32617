//! GTIN-14 check digit validation
//!
//! Validation never fails with an error: malformed input produces a
//! [`GtinValidation`] with `is_valid == false` and a message suitable for
//! showing next to the input field.

mod validator;


pub use validator::{GTIN_LENGTH, Gtin, GtinValidation, check_digit, validate_gtin};
