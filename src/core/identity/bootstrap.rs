//! Wallet start-up sequence

use super::resolver::{IdentityResolver, create_unique_identity};
use crate::config::{IdentityConfig, PermissionsConfig};
use crate::core::permissions::{AuthorizedHandler, ClientEnvironment, PermissionsWatcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Navigates to the home page when authorization arrives during boot
pub struct NavigateHomeHandler {
    env: Arc<dyn ClientEnvironment>,
    config: PermissionsConfig,
}

impl NavigateHomeHandler {
    pub fn new(env: Arc<dyn ClientEnvironment>, config: PermissionsConfig) -> Self {
        Self { env, config }
    }
}

#[async_trait]
impl AuthorizedHandler for NavigateHomeHandler {
    async fn on_authorized(&self) {
        if self.config.is_boot_page(&self.env.current_page()) {
            self.env.navigate(&self.config.home_page, None).await;
        }
    }
}

/// Result of a bootstrap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// DID the wallet runs as
    pub did: String,
    /// Whether the identity was created during this run
    pub created: bool,
}

/// Brings the wallet from "no state" to "watched identity"
pub struct WalletBootstrap {
    identity: IdentityConfig,
    permissions: PermissionsConfig,
    resolver: Arc<dyn IdentityResolver>,
    env: Arc<dyn ClientEnvironment>,
    watcher: PermissionsWatcher,
}

impl WalletBootstrap {
    pub fn new(
        identity: IdentityConfig,
        permissions: PermissionsConfig,
        resolver: Arc<dyn IdentityResolver>,
        env: Arc<dyn ClientEnvironment>,
        watcher: PermissionsWatcher,
    ) -> Self {
        Self {
            identity,
            permissions,
            resolver,
            env,
            watcher,
        }
    }

    /// The watcher started by [`run`](Self::run)
    pub fn watcher(&self) -> &PermissionsWatcher {
        &self.watcher
    }

    /// Load or create the wallet identity and start watching it
    ///
    /// A newly created DID is stored as the main DID after the watcher starts.
    pub async fn run(&self, username: &str) -> Result<BootstrapOutcome> {
        let existing = match self.resolver.main_did().await {
            Ok(did) => did,
            Err(e) => {
                debug!("Main DID not available: {}", e);
                None
            }
        };

        let (did, created) = match existing {
            Some(did) => (did, false),
            None => {
                let did =
                    create_unique_identity(self.resolver.as_ref(), &self.identity, username)
                        .await?;
                (did, true)
            }
        };

        let handler = NavigateHomeHandler::new(self.env.clone(), self.permissions.clone());
        self.watcher.start(did.clone(), Some(Arc::new(handler))).await?;

        if created {
            self.resolver.set_main_did(&did).await?;
            info!("Stored new wallet identity {}", did);
        }

        Ok(BootstrapOutcome { did, created })
    }
}
