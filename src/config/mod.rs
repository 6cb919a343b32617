//! Configuration management for the wallet
//!
//! This module handles loading, validation, and access to all wallet configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, WalletError};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix shared by all environment variables the wallet reads
pub const ENV_PREFIX: &str = "EPI_WALLET_";

/// Main configuration struct for the wallet
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Wallet configuration
    pub wallet: WalletConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WalletError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let wallet: WalletConfig = serde_yaml::from_str(content)
            .map_err(|e| WalletError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { wallet };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables (and a `.env` file if present)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // A missing .env file is fine, the process environment still applies
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from defaults overridden by `lookup`
    ///
    /// `lookup` receives full variable names such as `EPI_WALLET_MAX_BATCH_SIZE`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut wallet = WalletConfig::default();

        if let Some(v) = var("MAX_BATCH_SIZE") {
            wallet.pipeline.max_batch_size = parse_var("MAX_BATCH_SIZE", &v)?;
        }
        if let Some(v) = var("FLUSH_INTERVAL_MS") {
            wallet.pipeline.flush_interval_ms = parse_var("FLUSH_INTERVAL_MS", &v)?;
        }
        if let Some(v) = var("CHECK_INTERVAL_MS") {
            wallet.permissions.check_interval_ms = parse_var("CHECK_INTERVAL_MS", &v)?;
        }
        if let Some(v) = var("BOOT_PAGES") {
            wallet.permissions.boot_pages = v
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }
        if let Some(v) = var("APP_NAME") {
            wallet.identity.app_name = v;
        }
        if let Some(v) = var("VAULT_DOMAIN") {
            wallet.identity.vault_domain = v;
        }
        if let Some(v) = var("LOG_LEVEL") {
            wallet.logging.level = v;
        }
        if let Some(v) = var("LOG_JSON") {
            wallet.logging.json = parse_var("LOG_JSON", &v)?;
        }

        let config = Self { wallet };
        config.validate()?;
        Ok(config)
    }

    /// Get pipeline configuration
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.wallet.pipeline
    }

    /// Get credential watcher configuration
    pub fn permissions(&self) -> &PermissionsConfig {
        &self.wallet.permissions
    }

    /// Get identity configuration
    pub fn identity(&self) -> &IdentityConfig {
        &self.wallet.identity
    }

    /// Get import configuration
    pub fn import(&self) -> &ImportConfig {
        &self.wallet.import
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.wallet.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.wallet
            .pipeline
            .validate()
            .map_err(|e| WalletError::Config(format!("Pipeline config error: {}", e)))?;

        self.wallet
            .permissions
            .validate()
            .map_err(|e| WalletError::Config(format!("Permissions config error: {}", e)))?;

        self.wallet
            .identity
            .validate()
            .map_err(|e| WalletError::Config(format!("Identity config error: {}", e)))?;

        self.wallet
            .import
            .validate()
            .map_err(|e| WalletError::Config(format!("Import config error: {}", e)))?;

        self.wallet
            .logging
            .validate()
            .map_err(|e| WalletError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.wallet)
            .map_err(|e| WalletError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        WalletError::Config(format!(
            "Invalid value for {}{}: {:?}",
            ENV_PREFIX, name, value
        ))
    })
}
