//! Per log type rendering

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Shown when a field is unknown
pub const PLACEHOLDER: &str = "-";

/// Kind of an audit log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    ProductLog,
    BatchLog,
    ProductPhotoLog,
    LeafletLog,
    VideoLog,
    FailedLog,
    RecoverLog,
    #[serde(other)]
    Unknown,
}

impl FromStr for LogType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PRODUCT_LOG" => LogType::ProductLog,
            "BATCH_LOG" => LogType::BatchLog,
            "PRODUCT_PHOTO_LOG" => LogType::ProductPhotoLog,
            "LEAFLET_LOG" => LogType::LeafletLog,
            "VIDEO_LOG" => LogType::VideoLog,
            "FAILED_LOG" => LogType::FailedLog,
            "RECOVER_LOG" => LogType::RecoverLog,
            _ => LogType::Unknown,
        })
    }
}

impl LogType {
    /// Log type of a raw entry, `Unknown` when absent or unrecognized
    pub fn of(item: &Value) -> Self {
        item.get("logType")
            .and_then(Value::as_str)
            .map_or(LogType::Unknown, |s| s.parse().unwrap_or(LogType::Unknown))
    }

    fn is_attachment(self) -> bool {
        matches!(
            self,
            LogType::ProductPhotoLog | LogType::LeafletLog | LogType::VideoLog
        )
    }
}

/// One audit row as displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogView {
    pub log_type: LogType,
    pub gtin: String,
    pub batch: String,
    pub reason: Option<String>,
    pub username: Option<String>,
    pub creation_time: Option<String>,
    pub details: Value,
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn metadata<'a>(item: &'a Value, field: &str) -> Option<&'a Value> {
    item.get("metadata")?.get(field)
}

fn creation_time(item: &Value) -> Option<String> {
    if let Some(time) = text(item.get("creationTime")) {
        return Some(time);
    }
    let millis = item.get("__timestamp")?.as_i64()?;
    DateTime::from_timestamp_millis(millis).map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn basic(item: &Value, log_type: LogType) -> AuditLogView {
    AuditLogView {
        log_type,
        gtin: text(metadata(item, "gtin")).unwrap_or_else(|| PLACEHOLDER.to_string()),
        batch: PLACEHOLDER.to_string(),
        reason: text(item.get("reason")),
        username: text(item.get("username")),
        creation_time: creation_time(item),
        details: item.clone(),
    }
}

fn item_code(item: &Value) -> Option<String> {
    text(item.get("itemCode"))
}

fn render(item: &Value, log_type: LogType) -> Option<AuditLogView> {
    let mut view = basic(item, log_type);
    match log_type {
        LogType::BatchLog => view.batch = item_code(item)?,
        t if t.is_attachment() => {
            if metadata(item, "attachedTo").and_then(Value::as_str) == Some("BATCH") {
                view.batch = item_code(item)?;
            }
        }
        LogType::FailedLog => {
            // Invalid fields reported at the top level belong with the metadata
            if item.get("logInfo").is_some() {
                if let Some(fields) = item.get("invalidFields") {
                    let mut details = item.clone();
                    let object = details.as_object_mut()?;
                    object.remove("invalidFields");
                    object
                        .get_mut("metadata")?
                        .as_object_mut()?
                        .insert("invalidFields".to_string(), fields.clone());
                    view.details = details;
                }
            }
        }
        LogType::RecoverLog => {
            if let Some(batch) = text(metadata(item, "batch")) {
                view.batch = batch;
            }
        }
        _ => {}
    }
    Some(view)
}

/// Render one raw audit entry
///
/// Never fails: entries that cannot be rendered for their type get the
/// basic rendering.
pub fn format_audit_log(item: &Value) -> AuditLogView {
    let log_type = LogType::of(item);
    render(item, log_type).unwrap_or_else(|| basic(item, log_type))
}

/// Render a page of raw audit entries
pub fn format_audit_logs(items: &[Value]) -> Vec<AuditLogView> {
    items.iter().map(format_audit_log).collect()
}
