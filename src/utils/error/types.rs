//! Error types for the wallet

use thiserror::Error;

/// Result type alias for the wallet
pub type Result<T> = std::result::Result<T, WalletError>;

/// Main error type for the wallet
#[derive(Error, Debug)]
pub enum WalletError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Identity resolution or creation errors
    #[error("Identity error: {0}")]
    Identity(String),

    /// Credential check or persistence errors
    #[error("Credential error: {0}")]
    Credential(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Message digestion errors
    #[error("Digestion error: {0}")]
    Digestion(String),

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
