//! Fan-out to multiple loggers and the shared process-wide handle

use super::level::Level;
use super::logger::Logger;
use super::record::Context;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Fans one log call out to any number of loggers.
///
/// Loggers keep their own thresholds, contexts, and destinations; a mux only
/// routes. Loggers added with a name can be fetched back for per-channel
/// adjustments.
///
/// # Example
///
/// ```
/// use logferry::core::{Level, Logger, Mux, DestinationConfig};
/// use logferry::destinations::MemoryDestination;
/// use logferry::format::RawFormat;
///
/// let dest = MemoryDestination::new(Box::new(RawFormat::new()));
/// let buffer = dest.buffer();
/// let mut logger = Logger::new(Box::new(dest)).with_run_level(Level::Debug);
/// logger.open(&DestinationConfig::new()).unwrap();
///
/// let mut mux = Mux::new();
/// mux.add_channel("audit", logger);
/// mux.info("fan out");
///
/// assert!(buffer.contents().contains("fan out"));
/// ```
#[derive(Default)]
pub struct Mux {
    loggers: Vec<Logger>,
    channels: BTreeMap<String, usize>,
}

impl Mux {
    pub fn new() -> Self {
        Self {
            loggers: Vec::new(),
            channels: BTreeMap::new(),
        }
    }

    /// Add an anonymous logger to the fan-out set.
    pub fn add_log(&mut self, logger: Logger) {
        self.loggers.push(logger);
    }

    /// Add a named logger; the name becomes the records' channel unless the
    /// logger already carries one.
    pub fn add_channel(&mut self, name: impl Into<String>, mut logger: Logger) {
        let name = name.into();
        if logger.channel().is_none() {
            logger.set_channel(name.clone());
        }
        self.channels.insert(name, self.loggers.len());
        self.loggers.push(logger);
    }

    /// Look up a named logger for per-channel adjustments.
    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Logger> {
        let index = *self.channels.get(name)?;
        self.loggers.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    pub fn loggers(&self) -> &[Logger] {
        &self.loggers
    }

    pub fn loggers_mut(&mut self) -> &mut [Logger] {
        &mut self.loggers
    }

    /// Close every logger and drop them all.
    pub fn reset(&mut self) {
        for logger in &mut self.loggers {
            logger.close();
        }
        self.loggers.clear();
        self.channels.clear();
    }

    /// Set the same threshold on every logger.
    pub fn set_run_level(&mut self, level: Level) {
        for logger in &mut self.loggers {
            logger.set_run_level(level);
        }
    }

    /// Close every logger without removing it.
    pub fn close(&mut self) {
        for logger in &mut self.loggers {
            logger.close();
        }
    }

    pub fn log(&mut self, level: Level, message: impl Into<String>) {
        self.log_with_context(level, message, Context::new());
    }

    pub fn log_with_context(
        &mut self,
        level: Level,
        message: impl Into<String>,
        context: Context,
    ) {
        let message = message.into();
        for logger in &mut self.loggers {
            logger.log_with_context(level, message.clone(), context.clone());
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
}

/// Cloneable, thread-safe handle around a [`Mux`].
///
/// Destinations block the calling thread and are not internally synchronized,
/// so multi-threaded hosts construct one `SharedLogger` at startup and pass
/// clones of the handle through the call graph. Each call takes the lock for
/// the duration of the delivery, including any backoff sleep.
///
/// # Example
///
/// ```
/// use logferry::core::{Level, Logger, Mux, SharedLogger, DestinationConfig};
/// use logferry::destinations::MemoryDestination;
/// use logferry::format::RawFormat;
///
/// let dest = MemoryDestination::new(Box::new(RawFormat::new()));
/// let buffer = dest.buffer();
/// let mut logger = Logger::new(Box::new(dest)).with_run_level(Level::Debug);
/// logger.open(&DestinationConfig::new()).unwrap();
///
/// let shared = SharedLogger::from_logger(logger);
/// let handle = shared.clone();
/// std::thread::spawn(move || handle.info("from worker")).join().unwrap();
///
/// assert!(buffer.contents().contains("from worker"));
/// ```
#[derive(Clone)]
pub struct SharedLogger {
    inner: Arc<Mutex<Mux>>,
}

impl SharedLogger {
    pub fn new(mux: Mux) -> Self {
        Self {
            inner: Arc::new(Mutex::new(mux)),
        }
    }

    /// Wrap a single logger in a one-entry mux.
    pub fn from_logger(logger: Logger) -> Self {
        let mut mux = Mux::new();
        mux.add_log(logger);
        Self::new(mux)
    }

    /// Run a closure with exclusive access to the mux.
    pub fn with<R>(&self, f: impl FnOnce(&mut Mux) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn set_run_level(&self, level: Level) {
        self.inner.lock().set_run_level(level);
    }

    pub fn close(&self) {
        self.inner.lock().close();
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.inner.lock().log(level, message);
    }

    pub fn log_with_context(&self, level: Level, message: impl Into<String>, context: Context) {
        self.inner.lock().log_with_context(level, message, context);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.log(Level::Notice, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical, message);
    }

    pub fn alert(&self, message: impl Into<String>) {
        self.log(Level::Alert, message);
    }

    pub fn emergency(&self, message: impl Into<String>) {
        self.log(Level::Emergency, message);
    }
}
