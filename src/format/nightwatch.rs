//! Nightwatch API format

use super::Format;
use crate::core::Record;
use chrono::SecondsFormat;

/// JSON shaped for the Laravel Nightwatch log API.
///
/// Levels are mapped to the lowercase names the API expects and the display
/// level text travels in `extra`, so nothing is lost when the two level
/// vocabularies disagree.
#[derive(Debug, Clone)]
pub struct NightwatchFormat {
    default_channel: String,
}

impl NightwatchFormat {
    pub fn new(default_channel: impl Into<String>) -> Self {
        Self {
            default_channel: default_channel.into(),
        }
    }
}

impl Default for NightwatchFormat {
    fn default() -> Self {
        Self::new("logferry")
    }
}

impl Format for NightwatchFormat {
    fn format(&self, record: &Record) -> String {
        let channel = record
            .channel
            .as_deref()
            .unwrap_or(self.default_channel.as_str());

        let mut extra = serde_json::json!({
            "level_text": record.level_text,
            "timestamp": record.timestamp.timestamp(),
        });
        if !record.context.is_empty() {
            extra["context_string"] = serde_json::Value::String(record.context.format_fields());
        }

        serde_json::json!({
            "level": record.level.api_name(),
            "message": record.message,
            "context": record.context.to_json_value(),
            "channel": channel,
            "datetime": record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            "extra": extra,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, Level};
    use crate::format::test_support::{fixed_record, fixed_record_with_context};

    #[test]
    fn test_levels_map_to_api_names() {
        let format = NightwatchFormat::default();
        let record = fixed_record(Level::Emergency, "all hands");

        let parsed: serde_json::Value = serde_json::from_str(&format.format(&record)).unwrap();
        assert_eq!(parsed["level"], "emergency");
        assert_eq!(parsed["extra"]["level_text"], "Emergency");
    }

    #[test]
    fn test_default_channel_applies_when_record_has_none() {
        let format = NightwatchFormat::new("orders");
        let record = fixed_record(Level::Info, "placed");

        let parsed: serde_json::Value = serde_json::from_str(&format.format(&record)).unwrap();
        assert_eq!(parsed["channel"], "orders");

        let stamped = fixed_record(Level::Info, "placed").with_channel("payments");
        let parsed: serde_json::Value = serde_json::from_str(&format.format(&stamped)).unwrap();
        assert_eq!(parsed["channel"], "payments");
    }

    #[test]
    fn test_context_travels_both_ways() {
        let format = NightwatchFormat::default();
        let record = fixed_record_with_context(
            Level::Warning,
            "slow query",
            Context::new().with_field("ms", 4200),
        );

        let parsed: serde_json::Value = serde_json::from_str(&format.format(&record)).unwrap();
        assert_eq!(parsed["context"]["ms"], 4200);
        assert_eq!(parsed["extra"]["context_string"], "ms=4200");
        assert_eq!(parsed["datetime"], "2024-09-01T07:03:45.000000Z");
    }

    #[test]
    fn test_empty_context_omits_context_string() {
        let format = NightwatchFormat::default();
        let record = fixed_record(Level::Debug, "noop");

        let parsed: serde_json::Value = serde_json::from_str(&format.format(&record)).unwrap();
        assert!(parsed["extra"].get("context_string").is_none());
    }
}
