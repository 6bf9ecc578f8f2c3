//! Destination trait: the delivery end of the pipeline

use super::config::DestinationConfig;
use super::error::Result;
use super::metrics::DeliveryMetrics;
use super::record::Record;
use crate::format::Format;

/// A sink that delivers formatted log text to an external system.
///
/// Lifecycle: construct with a [`Format`], `open()` once with configuration,
/// `write()` any number of times, `close()` when done. `open` is the only
/// operation that surfaces errors: configuration mistakes fail setup loudly,
/// while everything that can go wrong at runtime (connection loss, HTTP
/// failures, timeouts) stays inside the destination as a state transition
/// plus a dropped-message count.
///
/// Destinations are exclusively owned (`&mut self` throughout) and perform
/// blocking I/O on the calling thread, including backoff sleeps. They are not
/// safe for concurrent use without external locking; multi-threaded hosts
/// should wrap the owning logger in a
/// [`SharedLogger`](crate::core::SharedLogger) or dedicate one destination
/// per worker.
pub trait Destination: Send {
    /// Validate configuration and acquire resources.
    ///
    /// Network sinks perform exactly one connection attempt. `Ok(false)`
    /// means the configuration was acceptable but the remote end refused;
    /// the destination stays usable and will reconnect on write. `Err`
    /// is reserved for configuration mistakes.
    fn open(&mut self, config: &DestinationConfig) -> Result<bool>;

    /// Deliver one formatted record. Never fails; transport errors become
    /// internal state plus dropped-message counts.
    fn write(&mut self, text: &str, record: &Record);

    /// Flush pending state and release resources. Idempotent.
    fn close(&mut self);

    /// The formatter this destination was constructed with.
    fn formatter(&self) -> &dyn Format;

    fn name(&self) -> &'static str;

    /// Delivery counters for this destination.
    fn metrics(&self) -> &DeliveryMetrics;

    /// Format a record and write it.
    fn log(&mut self, record: &Record) {
        let text = self.formatter().format(record);
        self.write(&text, record);
    }
}

/// Diagnostic side channel for failures that are absorbed by design.
///
/// The logging pipeline never propagates transport errors to its caller, so
/// this is the one place they become visible.
pub(crate) fn diag(destination: &str, message: impl std::fmt::Display) {
    eprintln!("[logferry] {}: {}", destination, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;
    use crate::destinations::MemoryDestination;
    use crate::format::RawFormat;

    #[test]
    fn test_log_formats_then_writes() {
        let mut dest = MemoryDestination::new(Box::new(RawFormat::new()));
        dest.open(&DestinationConfig::new()).unwrap();

        let record = Record::new(Level::Info, "through the seam");
        dest.log(&record);

        assert_eq!(dest.data(), "through the seam\n");
        assert_eq!(dest.metrics().delivered_count(), 1);
    }

    #[test]
    fn test_formatter_accessor_exposes_injected_format() {
        let dest = MemoryDestination::new(Box::new(RawFormat::new()));
        let record = Record::new(Level::Error, "raw text");
        assert_eq!(dest.formatter().format(&record), "raw text");
    }
}
