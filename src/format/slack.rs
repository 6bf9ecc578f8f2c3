//! Slack markdown format

use super::{date_stamp, Format};
use crate::core::Record;

/// `[2024-09-01 7:03:45] *Error* _(key=value)_ ` followed by the message in
/// backticks. The context group is omitted when empty.
#[derive(Debug, Clone, Default)]
pub struct SlackFormat;

impl SlackFormat {
    pub fn new() -> Self {
        Self
    }
}

impl Format for SlackFormat {
    fn format(&self, record: &Record) -> String {
        let mut output = format!(
            "[{}] *{}*",
            date_stamp(&record.timestamp),
            record.level_text
        );

        if !record.context.is_empty() {
            output.push_str(&format!(" _({})_", record.context.format_fields()));
        }

        output.push_str(&format!(" `{}`", record.message));
        output
    }
}
