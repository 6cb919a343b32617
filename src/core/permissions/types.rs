//! Credential watching types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Group credential issued to the wallet identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCredential {
    /// DID of the group the credential grants membership of
    #[serde(rename = "groupDID")]
    pub group_did: String,
    /// Opaque credential payload
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Shared enclave the credential gives access to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnclaveCredential {
    pub enclave_type: String,
    #[serde(rename = "enclaveDID")]
    pub enclave_did: String,
    #[serde(rename = "enclaveKeySSI")]
    pub enclave_key_ssi: String,
}

/// Credentials currently held by the wallet identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSnapshot {
    pub group_credential: GroupCredential,
    pub enclave: EnclaveCredential,
}

impl CredentialSnapshot {
    /// Stable key deciding whether the snapshot needs persisting again
    pub fn persistence_key(&self) -> &str {
        &self.enclave.enclave_key_ssi
    }

    /// Group DID the credential belongs to
    pub fn group_did(&self) -> &str {
        &self.group_credential.group_did
    }

    /// Group name, i.e. the last `:` segment of the group DID
    pub fn group_name(&self) -> &str {
        group_name(self.group_did())
    }
}

pub(super) fn group_name(group_did: &str) -> &str {
    group_did.rsplit(':').next().unwrap_or(group_did)
}

/// Classification of credential check failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckErrorKind {
    /// The identity holds no credential record; equivalent to absent credentials
    NotFound,
    /// The check could not reach its backend
    Network,
    /// The backend refused to answer for this identity
    Unauthorized,
    /// Anything else
    Other,
}

impl fmt::Display for CheckErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error returned by a [`CredentialChecker`](super::CredentialChecker)
#[derive(Debug, Clone, Error)]
#[error("credential check failed ({kind}): {message}")]
pub struct CheckError {
    pub kind: CheckErrorKind,
    pub message: String,
}

impl CheckError {
    pub fn new(kind: CheckErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(CheckErrorKind::NotFound, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(CheckErrorKind::Network, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == CheckErrorKind::NotFound
    }
}

/// Authorization state as last observed by the watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessState {
    /// No check has completed yet
    Unchecked,
    /// A check is in flight
    Checking,
    /// Credentials were found
    Authorized,
    /// No credentials were found
    Unauthorized,
    /// The watcher was stopped
    Stopped,
}

/// What a single check cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Credentials present, nothing else to do
    Authorized,
    /// Credentials present while on a boot page; the authorized handler ran
    AuthorizedOnBootPage,
    /// The group changed; the client was told to refresh
    CredentialsRotated { previous: String, current: String },
    /// Persisting new credentials failed; the client was told to refresh
    PersistFailed,
    /// No credentials while booting; redirected to identity creation
    RedirectedToIdentityCreation,
    /// Credentials lost after boot; local state reset and client refreshed
    CredentialsRevoked,
    /// The watcher is stopped, nothing was checked
    Stopped,
}
