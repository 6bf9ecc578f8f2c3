//! Plain text format

use super::{date_stamp, Format};
use crate::core::Record;

/// `[2024-09-01 7:03:45][Info] message key=value|key=value`
///
/// The date prefix is optional; context fields are appended when present.
#[derive(Debug, Clone)]
pub struct PlainTextFormat {
    show_date: bool,
}

impl PlainTextFormat {
    pub fn new(show_date: bool) -> Self {
        Self { show_date }
    }
}

impl Default for PlainTextFormat {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Format for PlainTextFormat {
    fn format(&self, record: &Record) -> String {
        let mut output = String::new();

        if self.show_date {
            output.push('[');
            output.push_str(&date_stamp(&record.timestamp));
            output.push(']');
        }

        output.push('[');
        output.push_str(&record.level_text);
        output.push_str("] ");
        output.push_str(&record.message);

        if !record.context.is_empty() {
            output.push(' ');
            output.push_str(&record.context.format_fields());
        }

        output
    }
}
