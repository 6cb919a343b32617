//! Message pipeline configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batching parameters for message digestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum messages handed to the digester in one group
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// How long a partial group may wait before it is flushed
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
        }
    }
}

impl PipelineConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}
