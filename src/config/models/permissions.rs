//! Credential watcher configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Credential watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// Interval between credential checks
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    /// Pages on which authorization changes trigger navigation
    #[serde(default = "default_boot_pages")]
    pub boot_pages: Vec<String>,
    /// Page to redirect to when no credentials exist during boot
    #[serde(default = "default_identity_creation_page")]
    pub identity_creation_page: String,
    /// Page to navigate to once authorized during boot
    #[serde(default = "default_home_page")]
    pub home_page: String,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: default_check_interval_ms(),
            boot_pages: default_boot_pages(),
            identity_creation_page: default_identity_creation_page(),
            home_page: default_home_page(),
        }
    }
}

impl PermissionsConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Whether `page` is one of the boot-time-only pages
    pub fn is_boot_page(&self, page: &str) -> bool {
        self.boot_pages.iter().any(|p| p == page)
    }
}
