//! Logger: binds a destination to a threshold, context, and filters

use super::config::DestinationConfig;
use super::destination::Destination;
use super::error::{LogError, Result};
use super::filter::{apply_filters, Filter};
use super::level::Level;
use super::metrics::DeliveryMetrics;
use super::record::{Context, Record};

/// Routes leveled messages to one destination.
///
/// A logger owns its destination exclusively and performs all delivery work
/// (formatting, filtering, blocking network I/O) on the calling thread. The
/// default run level is [`Level::Error`]; anything below the threshold is
/// discarded before a record is even built.
///
/// # Example
///
/// ```
/// use logferry::core::{Level, Logger, DestinationConfig};
/// use logferry::destinations::MemoryDestination;
/// use logferry::format::PlainTextFormat;
///
/// let dest = MemoryDestination::new(Box::new(PlainTextFormat::new(false)));
/// let buffer = dest.buffer();
///
/// let mut logger = Logger::new(Box::new(dest));
/// logger.open(&DestinationConfig::new()).unwrap();
/// logger.set_run_level(Level::Info);
///
/// logger.info("service started");
/// logger.debug("not recorded, below threshold");
///
/// assert!(buffer.contents().contains("service started"));
/// assert!(!buffer.contents().contains("below threshold"));
/// ```
pub struct Logger {
    destination: Box<dyn Destination>,
    run_level: Level,
    context: Context,
    channel: Option<String>,
    filters: Vec<Box<dyn Filter>>,
}

impl Logger {
    /// Create a logger for the given destination with the default threshold.
    pub fn new(destination: Box<dyn Destination>) -> Self {
        Self {
            destination,
            run_level: Level::default(),
            context: Context::new(),
            channel: None,
            filters: Vec::new(),
        }
    }

    /// Set the threshold (builder style)
    #[must_use]
    pub fn with_run_level(mut self, level: Level) -> Self {
        self.run_level = level;
        self
    }

    /// Set the channel name stamped on every record (builder style)
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Open the underlying destination.
    ///
    /// Configuration errors propagate; `Ok(false)` means a network sink could
    /// not connect yet and will retry on the first write.
    pub fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        self.destination.open(config)
    }

    /// Close the underlying destination (flushes pending state; idempotent).
    pub fn close(&mut self) {
        self.destination.close();
    }

    pub fn run_level(&self) -> Level {
        self.run_level
    }

    pub fn set_run_level(&mut self, level: Level) {
        self.run_level = level;
    }

    /// Set the threshold from text ("debug", "WARNING", ...).
    pub fn set_run_level_text(&mut self, text: &str) -> Result<()> {
        let level = text
            .parse::<Level>()
            .map_err(|_| LogError::InvalidRunLevel(text.to_string()))?;
        self.run_level = level;
        Ok(())
    }

    /// Set a persistent context field included on every record.
    pub fn set_context<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<super::value::Value>,
    {
        self.context.add_field(key, value);
    }

    /// Remove a persistent context field.
    pub fn remove_context(&mut self, key: &str) {
        self.context.remove(key);
    }

    pub fn clear_context(&mut self) {
        self.context = Context::new();
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn set_channel(&mut self, channel: impl Into<String>) {
        self.channel = Some(channel.into());
    }

    /// Append a filter to the chain. Filters run in insertion order after the
    /// threshold check; any veto discards the record.
    pub fn add_filter(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn destination(&self) -> &dyn Destination {
        self.destination.as_ref()
    }

    /// Delivery counters of the underlying destination.
    pub fn metrics(&self) -> &DeliveryMetrics {
        self.destination.metrics()
    }

    /// Log a message at the given level.
    pub fn log(&mut self, level: Level, message: impl Into<String>) {
        self.log_with_context(level, message, Context::new());
    }

    /// Log a message with call-site context.
    ///
    /// Call-site fields win over the logger's persistent context on key
    /// collisions.
    pub fn log_with_context(&mut self, level: Level, message: impl Into<String>, context: Context) {
        if level < self.run_level {
            return;
        }

        let mut merged = context;
        merged.merge_defaults(&self.context);

        let mut record = Record::new(level, message).with_context(merged);
        if let Some(channel) = &self.channel {
            record = record.with_channel(channel.clone());
        }

        if let Some(record) = apply_filters(&self.filters, record) {
            self.destination.log(&record);
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.log(Level::Notice, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&mut self, message: impl Into<String>) {
        self.log(Level::Critical, message);
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.log(Level::Alert, message);
    }

    pub fn emergency(&mut self, message: impl Into<String>) {
        self.log(Level::Emergency, message);
    }

    pub fn info_with_context(&mut self, message: impl Into<String>, context: Context) {
        self.log_with_context(Level::Info, message, context);
    }

    pub fn error_with_context(&mut self, message: impl Into<String>, context: Context) {
        self.log_with_context(Level::Error, message, context);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // close() is idempotent, so an explicit close before drop is fine
        self.destination.close();
    }
}
