//! HTML format

use super::{date_stamp, Format};
use crate::core::Record;

/// `<small>2024-09-01 7:03:45</small> Info key=value message<br>`
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat;

impl HtmlFormat {
    pub fn new() -> Self {
        Self
    }
}

impl Format for HtmlFormat {
    fn format(&self, record: &Record) -> String {
        format!(
            "<small>{}</small> {} {} {}<br>",
            date_stamp(&record.timestamp),
            record.level_text,
            record.context.format_fields(),
            record.message
        )
    }
}
