//! Wallet messages and the digester seam
//!
//! Messages are JSON documents understood by the external mapping engine. The
//! wallet only creates envelopes and reads rejection reasons back.

use super::pipeline::{GroupHandler, MessagesPipe};
use crate::config::PipelineConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::warn;

/// A message as exchanged with the mapping engine
pub type Message = Value;

/// Version stamped on every message created by the wallet
pub const MESSAGE_TYPE_VERSION: u32 = 1;

/// Field the mapping engine attaches to rejected messages
pub const REASON_FIELD: &str = "reason";

/// External engine turning messages into stored records
#[async_trait]
pub trait MessageDigester: Send + Sync {
    /// Digest a group, returning the messages that could not be digested
    ///
    /// Rejected messages carry a `reason` object with `originalMessage`
    /// and/or `debug_message`.
    async fn digest_messages(&self, messages: Vec<Message>) -> Result<Vec<Message>>;
}

/// Create an empty message envelope of the given type
pub fn init_message(message_type: &str, sender_id: &str) -> Message {
    json!({
        "messageType": message_type,
        "messageTypeVersion": MESSAGE_TYPE_VERSION,
        "senderId": sender_id,
        "receiverId": "",
        "messageId": uuid::Uuid::new_v4().to_string(),
        "messageDateTime": chrono::Utc::now().to_rfc3339(),
    })
}

/// The `messageType` of a message, if any
pub fn message_type(message: &Message) -> Option<&str> {
    message.get("messageType").and_then(Value::as_str)
}

/// Attach a rejection reason to a message
///
/// Non-object messages are wrapped as `{"message": ..., "reason": ...}`.
pub fn mark_undigested(message: Message, debug_message: &str) -> Message {
    let reason = json!({ "debug_message": debug_message });
    match message {
        Value::Object(mut map) => {
            map.insert(REASON_FIELD.to_string(), reason);
            Value::Object(map)
        }
        other => {
            let mut map = Map::new();
            map.insert("message".to_string(), other);
            map.insert(REASON_FIELD.to_string(), reason);
            Value::Object(map)
        }
    }
}

/// Human readable rejection reason of an undigested message
///
/// Prefers `originalMessage` over `debug_message`.
pub fn undigested_reason(message: &Message) -> Option<String> {
    let reason = message.get(REASON_FIELD)?;
    if let Some(text) = reason.as_str() {
        return Some(text.to_string());
    }
    reason
        .get("originalMessage")
        .and_then(Value::as_str)
        .or_else(|| reason.get("debug_message").and_then(Value::as_str))
        .map(str::to_string)
}

/// Distinct rejection reasons, in first-seen order
pub fn collect_errors(undigested: &[Message]) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();
    for message in undigested {
        let reason =
            undigested_reason(message).unwrap_or_else(|| "Unknown digestion error".to_string());
        if !errors.contains(&reason) {
            errors.push(reason);
        }
    }
    errors
}

/// Group handler forwarding every group to a [`MessageDigester`]
///
/// A failing digester rejects the whole group.
pub struct DigesterHandler {
    digester: Arc<dyn MessageDigester>,
}

impl DigesterHandler {
    pub fn new(digester: Arc<dyn MessageDigester>) -> Self {
        Self { digester }
    }
}

#[async_trait]
impl GroupHandler<Message> for DigesterHandler {
    async fn handle_group(&self, group: Vec<Message>) -> Vec<Message> {
        let fallback = group.clone();
        match self.digester.digest_messages(group).await {
            Ok(undigested) => undigested,
            Err(e) => {
                warn!("Failed to digest group of {} messages: {}", fallback.len(), e);
                let reason = e.to_string();
                fallback
                    .into_iter()
                    .map(|m| mark_undigested(m, &reason))
                    .collect()
            }
        }
    }
}

/// Run one digestion round through a fresh pipe
///
/// Returns every message the digester rejected.
pub async fn digest_in_batches(
    config: &PipelineConfig,
    digester: Arc<dyn MessageDigester>,
    messages: Vec<Message>,
) -> Result<Vec<Message>> {
    if messages.is_empty() {
        return Ok(Vec::new());
    }

    let pipe = MessagesPipe::<Message>::from_config(config);
    pipe.on_new_group(DigesterHandler::new(digester))?;
    pipe.add_in_queue(messages)?;
    let undigested = pipe.drain().await;
    pipe.close();
    Ok(undigested)
}
