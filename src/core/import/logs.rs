//! Import log presentation

use crate::core::messages::Message;
use crate::utils::error::Result;
use crate::utils::time::{from_millis, time_ago};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status of a successfully mapped message
pub const LOG_STATUS_SUCCESS: &str = "success";

/// Mapping log entry written by the mapping engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLog {
    #[serde(default)]
    pub item_code: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub status: String,
    /// Original message, absent for entries that cannot be retried
    #[serde(default)]
    pub message: Option<Message>,
    /// Epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImportLog {
    pub fn is_success(&self) -> bool {
        self.status == LOG_STATUS_SUCCESS
    }
}

/// Log entry decorated for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLogView {
    #[serde(flatten)]
    pub log: ImportLog,
    pub time_ago: String,
    pub is_fresh: bool,
    /// `{itemCode}_{timestamp}`, set on failed entries only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// Selected for re-submission
    pub retry: bool,
}

/// Import logs split by outcome, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLogs {
    pub successful: Vec<ImportLogView>,
    pub failed: Vec<ImportLogView>,
}

impl ImportLogs {
    /// Select or clear every failed entry for retry
    pub fn set_retry_all(&mut self, retry: bool) {
        for log in &mut self.failed {
            log.retry = retry;
        }
    }

    /// Whether any failed entry is selected for retry
    pub fn has_retry_selection(&self) -> bool {
        self.failed.iter().any(|log| log.retry)
    }
}

/// Source of the mapping logs
#[async_trait]
pub trait ImportLogSource: Send + Sync {
    /// All logs, oldest first
    async fn mapping_logs(&self) -> Result<Vec<ImportLog>>;
}

/// Decorate and split logs as seen at `now`
///
/// Entries without a message are dropped. The input is expected oldest
/// first; each list is returned newest first.
pub fn partition_import_logs(
    logs: Vec<ImportLog>,
    now: DateTime<Utc>,
    fresh_window: Duration,
) -> ImportLogs {
    let mut partitioned = ImportLogs::default();

    for log in logs.into_iter().filter(|log| log.message.is_some()) {
        let logged_at = from_millis(log.timestamp);
        let time_ago = time_ago(logged_at, now);
        let is_fresh = now - logged_at < fresh_window;

        if log.is_success() {
            partitioned.successful.push(ImportLogView {
                log,
                time_ago,
                is_fresh,
                item_id: None,
                retry: false,
            });
        } else {
            let item_id = format!("{}_{}", log.item_code, log.timestamp);
            partitioned.failed.push(ImportLogView {
                log,
                time_ago,
                is_fresh,
                item_id: Some(item_id),
                retry: false,
            });
        }
    }

    partitioned.successful.reverse();
    partitioned.failed.reverse();
    partitioned
}
