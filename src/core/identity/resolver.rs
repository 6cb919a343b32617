//! Identity resolution and unique-name creation

use crate::config::IdentityConfig;
use crate::utils::error::{Result, WalletError};
use async_trait::async_trait;
use tracing::{debug, info};

/// Access to the wallet's DID registry
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// DID the wallet runs as, if one was stored
    async fn main_did(&self) -> Result<Option<String>>;

    /// Store the DID the wallet runs as
    async fn set_main_did(&self, did: &str) -> Result<()>;

    /// Resolve a DID; `Ok(None)` means it does not exist
    async fn resolve(&self, did: &str) -> Result<Option<String>>;

    /// Create a new identity and return its DID
    async fn create_identity(&self, method: &str, domain: &str, name: &str) -> Result<String>;
}

/// DID of a name-based identity in `domain`
pub fn name_did(domain: &str, name: &str) -> String {
    format!("did:ssi:name:{}:{}", domain, name)
}

/// Create an identity named `{app}/{username}`, appending a counter while taken
///
/// Suffixes accumulate: `app/user`, then `app/user1`, `app/user12`, ... A resolve error
/// counts as "not taken".
pub async fn create_unique_identity(
    resolver: &dyn IdentityResolver,
    config: &IdentityConfig,
    username: &str,
) -> Result<String> {
    let base = format!("{}/{}", config.app_name, username);
    let mut candidate = base.clone();

    for attempt in 1..=config.max_name_attempts {
        let taken = match resolver
            .resolve(&name_did(&config.vault_domain, &candidate))
            .await
        {
            Ok(found) => found.is_some(),
            Err(e) => {
                debug!("Resolving {} failed, treating as free: {}", candidate, e);
                false
            }
        };

        if !taken {
            info!("Creating identity {}", candidate);
            return resolver
                .create_identity(&config.did_method, &config.vault_domain, &candidate)
                .await;
        }

        debug!("Identity name {} is taken", candidate);
        candidate.push_str(&attempt.to_string());
    }

    Err(WalletError::identity(format!(
        "No free identity name for {} after {} attempts",
        base, config.max_name_attempts
    )))
}
