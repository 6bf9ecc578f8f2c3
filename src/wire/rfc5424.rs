//! RFC 5424 syslog message building
//!
//! Shared by the Papertrail (TCP) and UDP syslog destinations. One message:
//!
//! `<priority>1 timestamp hostname app-name procid msgid sd-data msg`
//!
//! where `priority = facility * 8 + severity` and the record context becomes
//! one structured-data element under the configured SD-ID.

use crate::core::{Level, Record, Value};
use chrono::SecondsFormat;

/// RFC 5424 NILVALUE, used for any absent header field.
pub const NILVALUE: &str = "-";

/// Default facility: 16 (local0).
pub const DEFAULT_FACILITY: u8 = 16;

/// Facilities are a 5-bit field; 0..=23 covers the assigned range.
pub const MAX_FACILITY: u8 = 23;

/// `facility * 8 + severity` per RFC 5424 section 6.2.1.
pub fn priority(facility: u8, level: Level) -> u8 {
    facility * 8 + level.syslog_severity()
}

/// Hostname for the HOSTNAME header field: the `HOSTNAME` environment
/// variable when set, otherwise NILVALUE.
pub fn default_hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| NILVALUE.to_string())
}

/// SD-PARAM names admit a restricted character set; everything else becomes
/// an underscore.
fn sanitize_param_name(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Escape `\`, `"` and `]` in an SD-PARAM value per RFC 5424 section 6.3.3.
fn escape_param_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            ']' => escaped.push_str("\\]"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn param_value(value: &Value) -> String {
    match value {
        // Arrays keep their structure as inline JSON
        Value::Array(_) => serde_json::to_string(&value.to_json_value())
            .unwrap_or_else(|_| value.to_string()),
        other => other.to_string(),
    }
}

/// Render the record context as one structured-data element, or NILVALUE
/// when the context is empty.
pub fn structured_data(sd_id: &str, record: &Record) -> String {
    if record.context.is_empty() {
        return NILVALUE.to_string();
    }

    let params: Vec<String> = record
        .context
        .fields()
        .iter()
        .map(|(key, value)| {
            format!(
                "{}=\"{}\"",
                sanitize_param_name(key),
                escape_param_value(&param_value(value))
            )
        })
        .collect();

    format!("[{} {}]", sd_id, params.join(" "))
}

/// Build one complete RFC 5424 message (no trailing newline; the transport
/// decides framing).
pub fn format_message(
    facility: u8,
    hostname: &str,
    sd_id: &str,
    text: &str,
    record: &Record,
) -> String {
    let app_name = record.channel.as_deref().unwrap_or("logferry");

    format!(
        "<{}>1 {} {} {} {} {} {} {}",
        priority(facility, record.level),
        record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        hostname,
        app_name,
        std::process::id(),
        NILVALUE,
        structured_data(sd_id, record),
        text
    )
}
