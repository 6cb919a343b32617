//! Test fixtures
//!
//! Factory functions for credentials and configuration with sensible defaults.

use epi_wallet::Config;
use epi_wallet::core::permissions::{CredentialSnapshot, EnclaveCredential, GroupCredential};
use serde_json::json;

/// Vault domain used by [`test_config`]
pub const VAULT_DOMAIN: &str = "vault.test";

/// Application name used by [`test_config`]
pub const APP_NAME: &str = "epi";

/// Default configuration with a known identity namespace
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.wallet.identity.app_name = APP_NAME.to_string();
    config.wallet.identity.vault_domain = VAULT_DOMAIN.to_string();
    config.wallet.pipeline.flush_interval_ms = 20;
    config
}

/// Credentials for membership in `group`, keyed by `key_ssi`
pub fn snapshot(group: &str, key_ssi: &str) -> CredentialSnapshot {
    CredentialSnapshot {
        group_credential: GroupCredential {
            group_did: format!("did:ssi:group:{}:{}", VAULT_DOMAIN, group),
            payload: json!({"token": format!("credential-for-{}", group)}),
        },
        enclave: EnclaveCredential {
            enclave_type: "WalletDBEnclave".to_string(),
            enclave_did: format!("did:ssi:key:{}", key_ssi),
            enclave_key_ssi: key_ssi.to_string(),
        },
    }
}
