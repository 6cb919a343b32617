//! # epi-wallet
//!
//! Core services of an enterprise product-information wallet.
//!
//! ## Features
//!
//! - **GTIN validation**: GTIN-14 check digit verification with display messages
//! - **Message pipeline**: buffered batching of messages into serialized group digestion
//! - **Permissions watcher**: credential polling with rotation and revocation handling
//! - **Identity bootstrap**: unique wallet identity creation on first start
//! - **Import and product flows**: message import, import logs, product save
//! - **Audit formatting**: per log type rendering with a safe fallback
//!
//! ## Quick Start
//!
//! ```rust
//! use epi_wallet::validate_gtin;
//!
//! let result = validate_gtin("05012345678900");
//! assert!(result.is_valid);
//!
//! let result = validate_gtin("05012345678901");
//! assert_eq!(result.message, "Invalid GTIN. Last digit should be 0");
//! ```
//!
//! ## Batching messages
//!
//! ```rust,no_run
//! use epi_wallet::{FifoSupplier, MessagesPipe};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipe = MessagesPipe::new(30, Duration::from_secs(2), FifoSupplier);
//!     pipe.on_new_group_fn(|group: Vec<String>| async move {
//!         println!("digesting {} messages", group.len());
//!         Vec::new()
//!     })?;
//!     pipe.add_in_queue(vec!["a".to_string(), "b".to_string()])?;
//!     let undigested = pipe.drain().await;
//!     assert!(undigested.is_empty());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{Result, WalletError};

pub use core::audit::{AuditLogView, LogType, format_audit_log};
pub use core::gtin::{Gtin, GtinValidation, validate_gtin};
pub use core::identity::{BootstrapOutcome, IdentityResolver, WalletBootstrap};
pub use core::import::{ImportService, ImportSummary, parse_message_document};
pub use core::messages::{Message, MessageDigester};
pub use core::permissions::{AccessState, CheckOutcome, PermissionsWatcher};
pub use core::pipeline::{FifoSupplier, GroupHandler, KeyedSupplier, MessagesPipe};
pub use core::product::{ProductService, SaveOutcome, SaveRequest};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
