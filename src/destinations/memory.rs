//! In-memory destination for tests and capture

use crate::core::{DeliveryMetrics, Destination, DestinationConfig, Record, Result};
use crate::format::Format;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle onto a [`MemoryDestination`]'s captured output.
///
/// The destination is usually boxed away inside a logger; keeping a buffer
/// handle beforehand is how tests read what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    data: Arc<Mutex<String>>,
}

impl MemoryBuffer {
    pub fn contents(&self) -> String {
        self.data.lock().clone()
    }

    pub fn clear(&self) {
        self.data.lock().clear();
    }

    fn append_line(&self, text: &str) {
        let mut data = self.data.lock();
        data.push_str(text);
        data.push('\n');
    }
}

/// Appends each formatted record to a shared string, one line per record.
pub struct MemoryDestination {
    format: Box<dyn Format>,
    buffer: MemoryBuffer,
    metrics: DeliveryMetrics,
}

impl MemoryDestination {
    pub fn new(format: Box<dyn Format>) -> Self {
        Self {
            format,
            buffer: MemoryBuffer::default(),
            metrics: DeliveryMetrics::new(),
        }
    }

    /// A handle onto the captured output, valid after the destination is
    /// boxed into a logger.
    pub fn buffer(&self) -> MemoryBuffer {
        self.buffer.clone()
    }

    /// Everything captured so far.
    pub fn data(&self) -> String {
        self.buffer.contents()
    }
}

impl Destination for MemoryDestination {
    fn open(&mut self, _config: &DestinationConfig) -> Result<bool> {
        Ok(true)
    }

    fn write(&mut self, text: &str, _record: &Record) {
        self.buffer.append_line(text);
        self.metrics.record_delivered();
    }

    fn close(&mut self) {}

    fn formatter(&self) -> &dyn Format {
        self.format.as_ref()
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    fn metrics(&self) -> &DeliveryMetrics {
        &self.metrics
    }
}
