//! Identity bootstrap configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Identity bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Application name, used as the first segment of identity names
    #[serde(default)]
    pub app_name: String,
    /// Vault domain identities are anchored in
    #[serde(default)]
    pub vault_domain: String,
    /// DID method for newly created identities
    #[serde(default = "default_did_method")]
    pub did_method: String,
    /// Upper bound on unique-name attempts
    #[serde(default = "default_max_name_attempts")]
    pub max_name_attempts: u32,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            vault_domain: String::new(),
            did_method: default_did_method(),
            max_name_attempts: default_max_name_attempts(),
        }
    }
}
