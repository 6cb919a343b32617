//! GTIN-14 validator implementation

use crate::utils::error::WalletError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a GTIN-14, check digit included
pub const GTIN_LENGTH: usize = 14;

const MSG_NOT_NUMERIC: &str = "GTIN should be a numeric value";
const MSG_BAD_LENGTH: &str = "GTIN length should be 14";
const MSG_VALID: &str = "GTIN is valid";

/// Outcome of validating a GTIN candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtinValidation {
    /// Whether the candidate is a well-formed GTIN-14 with a matching check digit
    pub is_valid: bool,
    /// Check digit derived from the first 13 digits, when the input was well-formed
    pub expected_check_digit: Option<u8>,
    /// Human readable result
    pub message: String,
}

impl GtinValidation {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            expected_check_digit: None,
            message: message.into(),
        }
    }
}

/// Compute the check digit for the digits preceding it
///
/// Weights alternate 3, 1, 3, ... starting from the rightmost digit.
pub fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| {
            let weight = if i % 2 == 0 { 3 } else { 1 };
            u32::from(*d) * weight
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

/// Validate a GTIN-14 candidate
pub fn validate_gtin(candidate: &str) -> GtinValidation {
    // Empty input has no non-digit and falls through to the length check
    if !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return GtinValidation::rejected(MSG_NOT_NUMERIC);
    }

    if candidate.len() != GTIN_LENGTH {
        return GtinValidation::rejected(MSG_BAD_LENGTH);
    }

    let digits: Vec<u8> = candidate.bytes().map(|b| b - b'0').collect();
    let (body, last) = digits.split_at(GTIN_LENGTH - 1);
    let expected = check_digit(body);

    if last[0] != expected {
        return GtinValidation {
            is_valid: false,
            expected_check_digit: Some(expected),
            message: format!("Invalid GTIN. Last digit should be {}", expected),
        };
    }

    GtinValidation {
        is_valid: true,
        expected_check_digit: Some(expected),
        message: MSG_VALID.to_string(),
    }
}

/// A validated GTIN-14
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gtin(String);

impl Gtin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Gtin {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let validation = validate_gtin(s);
        if validation.is_valid {
            Ok(Self(s.to_string()))
        } else {
            Err(WalletError::Validation(validation.message))
        }
    }
}

impl TryFrom<String> for Gtin {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Gtin> for String {
    fn from(gtin: Gtin) -> Self {
        gtin.0
    }
}

impl fmt::Display for Gtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
