//! Error handling for the wallet
//!
//! This module defines the crate-wide error type and its helpers.

mod helpers;
mod types;


pub use types::{Result, WalletError};
