//! Collaborators of the credential watcher

use super::types::{CheckError, CredentialSnapshot};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use tracing::info;

/// Answers whether an identity currently holds group credentials
#[async_trait]
pub trait CredentialChecker: Send + Sync {
    /// `Ok(None)` and `CheckErrorKind::NotFound` both mean "no credentials"
    async fn check_authorization(
        &self,
        did: &str,
    ) -> std::result::Result<Option<CredentialSnapshot>, CheckError>;
}

/// Durable storage for the wallet credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Write the credentials and the shared enclave settings
    async fn persist(&self, snapshot: &CredentialSnapshot) -> Result<()>;

    /// Mark the stored credential deleted and remove the shared enclave
    async fn delete(&self) -> Result<()>;
}

/// The client the wallet runs in
#[async_trait]
pub trait ClientEnvironment: Send + Sync {
    /// Tag of the page currently shown
    fn current_page(&self) -> String;

    /// Navigate to `page`, optionally passing the wallet DID along
    async fn navigate(&self, page: &str, did: Option<&str>);

    /// Show an informational notice to the user
    fn notify_info(&self, message: &str);

    /// Show an error notice to the user
    fn notify_error(&self, message: &str, detail: &str);

    /// Discard all in-memory client state and reload
    async fn force_refresh(&self);
}

/// Invoked when the watcher finds credentials while a boot page is shown
#[async_trait]
pub trait AuthorizedHandler: Send + Sync {
    async fn on_authorized(&self);
}

/// Handler that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAuthorizedHandler;

#[async_trait]
impl AuthorizedHandler for LogAuthorizedHandler {
    async fn on_authorized(&self) {
        info!("User is authorized");
    }
}

/// Adapter turning an async closure into an [`AuthorizedHandler`]
pub struct FnAuthorizedHandler<F>(pub F);

#[async_trait]
impl<F, Fut> AuthorizedHandler for FnAuthorizedHandler<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn on_authorized(&self) {
        (self.0)().await
    }
}
