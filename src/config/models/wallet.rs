//! Top-level wallet configuration

use super::*;
use serde::{Deserialize, Serialize};

/// All configuration sections of the wallet
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WalletConfig {
    /// Message pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Credential watcher configuration
    #[serde(default)]
    pub permissions: PermissionsConfig,
    /// Identity bootstrap configuration
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Import configuration
    #[serde(default)]
    pub import: ImportConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
