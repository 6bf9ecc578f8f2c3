//! Destination that discards everything

use crate::core::{DeliveryMetrics, Destination, DestinationConfig, Record, Result};
use crate::format::Format;

/// Accepts and discards every record. Useful as a placeholder while wiring a
/// pipeline, or to silence a channel without removing it.
pub struct NullDestination {
    format: Box<dyn Format>,
    metrics: DeliveryMetrics,
}

impl NullDestination {
    pub fn new(format: Box<dyn Format>) -> Self {
        Self {
            format,
            metrics: DeliveryMetrics::new(),
        }
    }
}

impl Destination for NullDestination {
    fn open(&mut self, _config: &DestinationConfig) -> Result<bool> {
        Ok(true)
    }

    fn write(&mut self, _text: &str, _record: &Record) {
        self.metrics.record_delivered();
    }

    fn close(&mut self) {}

    fn formatter(&self) -> &dyn Format {
        self.format.as_ref()
    }

    fn name(&self) -> &'static str {
        "null"
    }

    fn metrics(&self) -> &DeliveryMetrics {
        &self.metrics
    }
}
