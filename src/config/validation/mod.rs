//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `wallet_validators`: validators for every configuration section
//! - `tests`: validator tests

mod trait_def;
mod wallet_validators;

pub use trait_def::Validate;
