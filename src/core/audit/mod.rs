//! Audit log formatting
//!
//! Every log kind gets its own rendering; anything unrecognized or malformed
//! falls back to the basic rendering so formatting never fails.

mod format;

pub use format::{AuditLogView, LogType, PLACEHOLDER, format_audit_log, format_audit_logs};
