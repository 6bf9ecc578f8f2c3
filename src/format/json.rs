//! JSON format

use super::Format;
use crate::core::Record;
use chrono::SecondsFormat;

/// One JSON object per record:
/// `{"timestamp", "level", "message", "channel", "context"}`.
///
/// The same shape network sinks put on the wire, so a JSON-formatted file can
/// be replayed against an HTTP destination.
#[derive(Debug, Clone, Default)]
pub struct JsonFormat;

impl JsonFormat {
    pub fn new() -> Self {
        Self
    }
}

impl Format for JsonFormat {
    fn format(&self, record: &Record) -> String {
        let payload = serde_json::json!({
            "timestamp": record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": record.level_text,
            "message": record.message,
            "channel": record.channel,
            "context": record.context.to_json_value(),
        });
        payload.to_string()
    }
}
