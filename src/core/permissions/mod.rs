//! Credential watching
//!
//! [`PermissionsWatcher`] periodically asks a [`CredentialChecker`] whether
//! the wallet identity still holds group credentials, persists newly seen
//! credentials, and reacts to rotation and revocation by notifying the user
//! and forcing a full client refresh.

mod tasks;
mod traits;
mod types;
mod watcher;


pub use traits::{
    AuthorizedHandler, ClientEnvironment, CredentialChecker, CredentialStore, FnAuthorizedHandler,
    LogAuthorizedHandler,
};
pub use types::{
    AccessState, CheckError, CheckErrorKind, CheckOutcome, CredentialSnapshot, EnclaveCredential,
    GroupCredential,
};
pub use watcher::{
    MSG_CREDENTIALS_CHANGED, MSG_CREDENTIALS_REMOVED, MSG_REFRESH_SOON, MSG_SAVE_FAILED,
    PermissionsWatcher,
};
