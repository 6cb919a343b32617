//! Message document parsing

use crate::core::messages::Message;
use crate::utils::error::{Result, WalletError};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Parse one message document
///
/// A document holds either a single message or an array of messages; arrays
/// are flattened one level.
pub fn parse_message_document(content: &str) -> Result<Vec<Message>> {
    let document: Value = serde_json::from_str(content)
        .map_err(|e| WalletError::validation(format!("Message should be an object: {}", e)))?;

    match document {
        Value::Array(messages) => Ok(messages),
        message => Ok(vec![message]),
    }
}

/// Read and parse every file, keeping file order
///
/// The first unreadable or malformed file aborts the whole import.
pub async fn parse_message_files<P>(paths: &[P]) -> Result<Vec<Message>>
where
    P: AsRef<Path>,
{
    let mut messages = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            WalletError::validation(format!("Error reading file {}: {}", path.display(), e))
        })?;
        let parsed = parse_message_document(&content)?;
        debug!("Read {} messages from {}", parsed.len(), path.display());
        messages.extend(parsed);
    }
    Ok(messages)
}
