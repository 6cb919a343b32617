//! Credential watcher state machine

use super::traits::{
    AuthorizedHandler, ClientEnvironment, CredentialChecker, CredentialStore, LogAuthorizedHandler,
};
use super::types::{AccessState, CheckErrorKind, CheckOutcome, CredentialSnapshot, group_name};
use crate::config::PermissionsConfig;
use crate::utils::error::{Result, WalletError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub const MSG_CREDENTIALS_CHANGED: &str = "Your credentials have changed!";
pub const MSG_CREDENTIALS_REMOVED: &str = "Your credentials were removed.";
pub const MSG_REFRESH_SOON: &str = "Application will refresh soon...";
pub const MSG_SAVE_FAILED: &str = "Failed to save wallet credentials.";

/// What the watcher remembers between cycles
#[derive(Debug, Default)]
pub(super) struct WatchState {
    /// Identity being watched
    pub did: Option<String>,
    /// Persistence key of the last credentials written to the store
    pub last_persisted_key: Option<String>,
    /// Group DID seen by the first successful check
    pub last_group_did: Option<String>,
    /// Last segment of `last_group_did`
    pub current_group: Option<String>,
}

/// Polls the credential checker and drives authorization side effects
///
/// Cloning yields another handle to the same watcher.
#[derive(Clone)]
pub struct PermissionsWatcher {
    pub(super) config: PermissionsConfig,
    pub(super) checker: Arc<dyn CredentialChecker>,
    pub(super) store: Arc<dyn CredentialStore>,
    pub(super) env: Arc<dyn ClientEnvironment>,
    pub(super) on_authorized: Arc<RwLock<Arc<dyn AuthorizedHandler>>>,
    /// Held for a whole cycle so checks never overlap
    pub(super) cycle: Arc<tokio::sync::Mutex<WatchState>>,
    pub(super) status: Arc<RwLock<AccessState>>,
    pub(super) stopped: Arc<AtomicBool>,
    pub(super) shutdown: Arc<Notify>,
    pub(super) task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl PermissionsWatcher {
    /// Create a watcher; nothing is checked until [`start`](Self::start)
    pub fn new(
        config: PermissionsConfig,
        checker: Arc<dyn CredentialChecker>,
        store: Arc<dyn CredentialStore>,
        env: Arc<dyn ClientEnvironment>,
    ) -> Self {
        Self {
            config,
            checker,
            store,
            env,
            on_authorized: Arc::new(RwLock::new(Arc::new(LogAuthorizedHandler))),
            cycle: Arc::new(tokio::sync::Mutex::new(WatchState::default())),
            status: Arc::new(RwLock::new(AccessState::Unchecked)),
            stopped: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
            task: Arc::new(Mutex::new(None)),
        }
    }

    /// Current authorization state
    pub fn status(&self) -> AccessState {
        *self.status.read()
    }

    /// Whether the last completed check found credentials
    pub fn is_authorized(&self) -> bool {
        self.status() == AccessState::Authorized
    }

    /// Whether [`stop`](Self::stop) was called
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Name of the group the wallet belongs to, once known
    pub async fn current_group(&self) -> Option<String> {
        self.cycle.lock().await.current_group.clone()
    }

    /// Identity being watched
    pub async fn did(&self) -> Option<String> {
        self.cycle.lock().await.did.clone()
    }

    /// Replace the handler run when credentials are found on a boot page
    pub fn set_authorized_handler(&self, handler: Arc<dyn AuthorizedHandler>) {
        *self.on_authorized.write() = handler;
    }

    /// Set the identity to watch without starting the timer
    pub async fn watch(&self, did: impl Into<String>) {
        self.cycle.lock().await.did = Some(did.into());
    }

    fn set_status(&self, status: AccessState) {
        // Stopped is terminal
        if self.is_stopped() {
            return;
        }
        *self.status.write() = status;
    }

    fn on_boot_page(&self) -> bool {
        self.config.is_boot_page(&self.env.current_page())
    }

    /// Run one check cycle and act on its result
    ///
    /// Cycles are serialized. A checker error other than "not found"
    /// aborts the cycle and is returned to the caller. A cycle whose check
    /// completes after [`stop`](Self::stop) has no side effects.
    pub async fn check_access_and_act(&self) -> Result<CheckOutcome> {
        let mut state = self.cycle.lock().await;
        if self.is_stopped() {
            return Ok(CheckOutcome::Stopped);
        }

        let did = state
            .did
            .clone()
            .ok_or_else(|| WalletError::credential("No identity to check"))?;

        let previous = self.status();
        self.set_status(AccessState::Checking);
        debug!("Checking credentials for {}", did);

        let checked = self.checker.check_authorization(&did).await;
        if self.is_stopped() {
            debug!("Watcher stopped during the check, dropping its result");
            return Ok(CheckOutcome::Stopped);
        }

        let snapshot = match checked {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_not_found() => {
                debug!("No credential record for {}: {}", did, e);
                None
            }
            Err(e) => {
                self.set_status(previous);
                return Err(match e.kind {
                    CheckErrorKind::Network => WalletError::Network(e.to_string()),
                    _ => WalletError::Credential(e.to_string()),
                });
            }
        };

        match snapshot {
            Some(snapshot) => self.act_on_credentials(&mut state, snapshot).await,
            None => self.act_on_missing_credentials(&mut state, &did).await,
        }
    }

    async fn act_on_credentials(
        &self,
        state: &mut WatchState,
        snapshot: CredentialSnapshot,
    ) -> Result<CheckOutcome> {
        self.set_status(AccessState::Authorized);

        if !self.save_credentials(state, &snapshot).await {
            return Ok(CheckOutcome::PersistFailed);
        }

        let group_did = snapshot.group_did().to_string();
        match state.last_group_did.clone() {
            None => {
                state.current_group = Some(group_name(&group_did).to_string());
                state.last_group_did = Some(group_did);
            }
            Some(previous) if previous != group_did => {
                info!("Group credential changed from {} to {}", previous, group_did);
                state.current_group = Some(group_name(&group_did).to_string());
                state.last_group_did = Some(group_did.clone());

                self.env.notify_info(MSG_CREDENTIALS_CHANGED);
                self.env.notify_info(MSG_REFRESH_SOON);
                self.env.force_refresh().await;
                return Ok(CheckOutcome::CredentialsRotated {
                    previous,
                    current: group_did,
                });
            }
            Some(_) => {}
        }

        if self.on_boot_page() {
            let handler = self.on_authorized.read().clone();
            handler.on_authorized().await;
            return Ok(CheckOutcome::AuthorizedOnBootPage);
        }

        Ok(CheckOutcome::Authorized)
    }

    async fn act_on_missing_credentials(
        &self,
        state: &mut WatchState,
        did: &str,
    ) -> Result<CheckOutcome> {
        self.set_status(AccessState::Unauthorized);

        if self.on_boot_page() {
            info!("No credentials yet, redirecting to identity creation");
            self.env
                .navigate(&self.config.identity_creation_page, Some(did))
                .await;
            return Ok(CheckOutcome::RedirectedToIdentityCreation);
        }

        // Reset whether or not credentials were ever seen
        self.reset_credentials(state).await?;

        self.env.notify_info(MSG_CREDENTIALS_REMOVED);
        self.env.notify_info(MSG_REFRESH_SOON);
        self.env.force_refresh().await;
        Ok(CheckOutcome::CredentialsRevoked)
    }

    /// Persist credentials unless they were already persisted
    ///
    /// Returns `false` when persisting failed and a refresh was forced.
    async fn save_credentials(&self, state: &mut WatchState, snapshot: &CredentialSnapshot) -> bool {
        let key = snapshot.persistence_key();
        if state.last_persisted_key.as_deref() == Some(key) {
            return true;
        }

        match self.store.persist(snapshot).await {
            Ok(()) => {
                debug!("Persisted credentials for group {}", snapshot.group_did());
                state.last_persisted_key = Some(key.to_string());
                true
            }
            Err(e) => {
                error!("Failed to persist credentials: {}", e);
                self.env.notify_error(MSG_SAVE_FAILED, &e.to_string());
                self.env.force_refresh().await;
                false
            }
        }
    }

    async fn reset_credentials(&self, state: &mut WatchState) -> Result<()> {
        info!("Resetting wallet credentials");
        self.store.delete().await?;
        state.last_persisted_key = None;
        state.last_group_did = None;
        state.current_group = None;
        Ok(())
    }
}
