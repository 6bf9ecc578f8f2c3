//! Raw format: message text only

use super::Format;
use crate::core::Record;

/// Passes the message through untouched, with no date, level, or context.
#[derive(Debug, Clone, Default)]
pub struct RawFormat;

impl RawFormat {
    pub fn new() -> Self {
        Self
    }
}

impl Format for RawFormat {
    fn format(&self, record: &Record) -> String {
        record.message.clone()
    }
}
