//! Record filters applied before formatting

use super::level::Level;
use super::record::Record;

/// A predicate or transform applied to records before delivery.
///
/// Filters take ownership of the record and either pass it through (possibly
/// replaced with an adjusted copy) or veto it by returning `None`.
pub trait Filter: Send {
    fn filter(&self, record: Record) -> Option<Record>;
}

/// Veto records below a severity threshold.
#[derive(Debug, Clone, Copy)]
pub struct RunLevelFilter {
    threshold: Level,
}

impl RunLevelFilter {
    pub fn new(threshold: Level) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }
}

impl Filter for RunLevelFilter {
    fn filter(&self, record: Record) -> Option<Record> {
        if record.level >= self.threshold {
            Some(record)
        } else {
            None
        }
    }
}

/// Run a record through a filter chain in order; any veto stops delivery.
pub fn apply_filters(filters: &[Box<dyn Filter>], record: Record) -> Option<Record> {
    let mut current = record;
    for filter in filters {
        current = filter.filter(current)?;
    }
    Some(current)
}
