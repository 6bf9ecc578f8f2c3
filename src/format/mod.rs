//! Record formats: pure `Record` → `String` renderers
//!
//! A destination is constructed with one of these; the same record can be
//! rendered as plain text for a file, JSON for a webhook, or Slack markdown
//! without the destination knowing the difference.

pub mod csv;
pub mod html;
pub mod json;
pub mod nightwatch;
pub mod plain;
pub mod raw;
pub mod slack;

pub use csv::CsvFormat;
pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use nightwatch::NightwatchFormat;
pub use plain::PlainTextFormat;
pub use raw::RawFormat;
pub use slack::SlackFormat;

use crate::core::Record;
use chrono::{DateTime, Utc};

/// Render a record as text.
pub trait Format: Send {
    fn format(&self, record: &Record) -> String;
}

/// Date stamp shared by the human-readable formats (`2024-09-01 7:03:45`,
/// 24-hour clock without a leading zero).
pub(crate) fn date_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %-H:%M:%S").to_string()
}
