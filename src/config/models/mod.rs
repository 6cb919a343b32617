//! Configuration data models
//!
//! This module defines all configuration structures used throughout the wallet.

pub mod identity;
pub mod import;
pub mod logging;
pub mod permissions;
pub mod pipeline;
pub mod wallet;

// Re-export all configuration types
pub use identity::*;
pub use import::*;
pub use logging::*;
pub use permissions::*;
pub use pipeline::*;
pub use wallet::*;

/// Default maximum number of messages per digestion group
pub fn default_max_batch_size() -> usize {
    30
}

/// Default flush interval for partial groups in milliseconds
pub fn default_flush_interval_ms() -> u64 {
    2_000
}

/// Longest accepted flush interval in milliseconds (one hour)
pub const MAX_FLUSH_INTERVAL_MS: u64 = 3_600_000;

/// Longest accepted credential check interval in milliseconds (one day)
pub const MAX_CHECK_INTERVAL_MS: u64 = 86_400_000;

/// Longest accepted import freshness window in seconds (one year)
pub const MAX_FRESH_WINDOW_SECS: u64 = 31_536_000;

/// Default credential check interval in milliseconds
pub fn default_check_interval_ms() -> u64 {
    10_000
}

/// Pages that are only shown while the wallet boots
pub fn default_boot_pages() -> Vec<String> {
    vec!["generate-did".to_string(), "landing-page".to_string()]
}

/// Page that hosts the identity creation flow
pub fn default_identity_creation_page() -> String {
    "generate-did".to_string()
}

/// Page shown once the wallet is authorized
pub fn default_home_page() -> String {
    "home".to_string()
}

/// Default DID method used for new identities
pub fn default_did_method() -> String {
    "ssi:name".to_string()
}

/// Default upper bound on unique-name attempts
pub fn default_max_name_attempts() -> u32 {
    1_000
}

/// Window during which an import log counts as fresh, in seconds
pub fn default_fresh_window_secs() -> u64 {
    60
}

/// Default log filter directive
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default true value
pub fn default_true() -> bool {
    true
}
