//! Import service

use super::logs::{ImportLogSource, ImportLogView, ImportLogs, partition_import_logs};
use crate::config::{ImportConfig, PipelineConfig};
use crate::core::messages::{Message, MessageDigester, digest_in_batches};
use crate::utils::error::{Result, WalletError};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Log list to show after an import round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportTab {
    Succeeded,
    Failed,
}

/// Result of one import round
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub submitted: usize,
    pub undigested: Vec<Message>,
    pub selected_tab: ImportTab,
}

impl ImportSummary {
    fn empty() -> Self {
        Self {
            submitted: 0,
            undigested: Vec::new(),
            selected_tab: ImportTab::Succeeded,
        }
    }

    pub fn digested(&self) -> usize {
        self.submitted.saturating_sub(self.undigested.len())
    }
}

/// Imports message documents into the mapping engine
pub struct ImportService {
    pipeline: PipelineConfig,
    import: ImportConfig,
    digester: Arc<dyn MessageDigester>,
    logs: Arc<dyn ImportLogSource>,
}

impl ImportService {
    pub fn new(
        pipeline: PipelineConfig,
        import: ImportConfig,
        digester: Arc<dyn MessageDigester>,
        logs: Arc<dyn ImportLogSource>,
    ) -> Self {
        Self {
            pipeline,
            import,
            digester,
            logs,
        }
    }

    /// Digest `messages` in batches and report what was rejected
    pub async fn process_messages(&self, messages: Vec<Message>) -> Result<ImportSummary> {
        if messages.is_empty() {
            return Ok(ImportSummary::empty());
        }

        let submitted = messages.len();
        let undigested = digest_in_batches(&self.pipeline, self.digester.clone(), messages).await?;

        let selected_tab = if undigested.is_empty() {
            ImportTab::Succeeded
        } else {
            warn!("{} of {} messages were not digested", undigested.len(), submitted);
            ImportTab::Failed
        };
        info!("Imported {} messages", submitted - undigested.len());

        Ok(ImportSummary {
            submitted,
            undigested,
            selected_tab,
        })
    }

    /// Current import logs as seen at `now`
    pub async fn import_logs(&self, now: DateTime<Utc>) -> Result<ImportLogs> {
        let logs = self.logs.mapping_logs().await?;
        debug!("Loaded {} mapping logs", logs.len());
        let window = i64::try_from(self.import.fresh_window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                WalletError::config(format!(
                    "Fresh window of {}s is out of range",
                    self.import.fresh_window_secs
                ))
            })?;
        Ok(partition_import_logs(logs, now, window))
    }

    /// Re-submit the failed entries selected for retry
    pub async fn retry_failed(&self, failed: &[ImportLogView]) -> Result<ImportSummary> {
        let messages: Vec<Message> = failed
            .iter()
            .filter(|view| view.retry)
            .filter_map(|view| view.log.message.clone())
            .collect();

        if messages.is_empty() {
            debug!("No failed messages selected for retry");
            return Ok(ImportSummary::empty());
        }

        info!("Retrying {} failed messages", messages.len());
        self.process_messages(messages).await
    }
}
