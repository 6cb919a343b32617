//! Message import
//!
//! Parses message documents, feeds them through a [`MessagesPipe`] into the
//! mapping engine and presents the resulting import logs.
//!
//! [`MessagesPipe`]: crate::core::pipeline::MessagesPipe

mod logs;
mod parser;
mod service;


pub use logs::{
    ImportLog, ImportLogSource, ImportLogView, ImportLogs, LOG_STATUS_SUCCESS, partition_import_logs,
};
pub use parser::{parse_message_document, parse_message_files};
pub use service::{ImportService, ImportSummary, ImportTab};
