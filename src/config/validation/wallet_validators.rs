//! Wallet configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for WalletConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating wallet configuration");

        self.pipeline.validate()?;
        self.permissions.validate()?;
        self.identity.validate()?;
        self.import.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_batch_size == 0 {
            return Err("Pipeline max_batch_size must be greater than 0".to_string());
        }

        if self.flush_interval_ms > MAX_FLUSH_INTERVAL_MS {
            return Err(format!(
                "Pipeline flush_interval_ms cannot exceed {}",
                MAX_FLUSH_INTERVAL_MS
            ));
        }

        Ok(())
    }
}

impl Validate for PermissionsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.check_interval_ms == 0 {
            return Err("Credential check interval must be greater than 0".to_string());
        }

        if self.check_interval_ms > MAX_CHECK_INTERVAL_MS {
            return Err(format!(
                "Credential check interval cannot exceed {} ms",
                MAX_CHECK_INTERVAL_MS
            ));
        }

        if self.identity_creation_page.trim().is_empty() {
            return Err("Identity creation page cannot be empty".to_string());
        }

        if self.home_page.trim().is_empty() {
            return Err("Home page cannot be empty".to_string());
        }

        if self.boot_pages.iter().any(|p| p.trim().is_empty()) {
            return Err("Boot pages cannot contain empty entries".to_string());
        }

        Ok(())
    }
}

impl Validate for IdentityConfig {
    fn validate(&self) -> Result<(), String> {
        if self.did_method.trim().is_empty() {
            return Err("DID method cannot be empty".to_string());
        }

        if self.max_name_attempts == 0 {
            return Err("max_name_attempts must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.fresh_window_secs > MAX_FRESH_WINDOW_SECS {
            return Err(format!(
                "Import fresh_window_secs cannot exceed {}",
                MAX_FRESH_WINDOW_SECS
            ));
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}
