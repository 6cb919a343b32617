//! Import configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Import log presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Logs younger than this are flagged as fresh
    #[serde(default = "default_fresh_window_secs")]
    pub fresh_window_secs: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            fresh_window_secs: default_fresh_window_secs(),
        }
    }
}
