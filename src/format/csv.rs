//! CSV format

use super::{date_stamp, Format};
use crate::core::Record;

/// `2024-09-01 7:03:45,Info, key=value|key=value, message`
#[derive(Debug, Clone, Default)]
pub struct CsvFormat;

impl CsvFormat {
    pub fn new() -> Self {
        Self
    }
}

impl Format for CsvFormat {
    fn format(&self, record: &Record) -> String {
        format!(
            "{},{}, {}, {}",
            date_stamp(&record.timestamp),
            record.level_text,
            record.context.format_fields(),
            record.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, Level};
    use crate::format::test_support::{fixed_record, fixed_record_with_context};

    #[test]
    fn test_csv_line() {
        let format = CsvFormat::new();
        let record = fixed_record_with_context(
            Level::Notice,
            "cache warmed",
            Context::new().with_field("entries", 512),
        );
        assert_eq!(
            format.format(&record),
            "2024-09-01 7:03:45,Notice, entries=512, cache warmed"
        );
    }

    #[test]
    fn test_empty_context_keeps_column() {
        let format = CsvFormat::new();
        let record = fixed_record(Level::Info, "plain");
        assert_eq!(format.format(&record), "2024-09-01 7:03:45,Info, , plain");
    }
}
