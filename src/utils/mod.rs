//! Utility modules for the wallet
//!
//! - **error**: crate-wide error type
//! - **logging**: tracing subscriber setup
//! - **time**: relative time formatting

pub mod error;
pub mod logging;
pub mod time;

pub use error::{Result, WalletError};
