//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They work against
//! anything with a `log(Level, String)` method: a [`Logger`](crate::Logger)
//! or a [`Mux`](crate::Mux).
//!
//! # Examples
//!
//! ```
//! use logferry::prelude::*;
//! use logferry::info;
//!
//! let dest = MemoryDestination::new(Box::new(RawFormat::new()));
//! let mut logger = Logger::new(Box::new(dest)).with_run_level(Level::Info);
//! logger.open(&DestinationConfig::new()).unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use logferry::prelude::*;
/// # let dest = MemoryDestination::new(Box::new(RawFormat::new()));
/// # let mut logger = Logger::new(Box::new(dest)).with_run_level(Level::Debug);
/// # logger.open(&DestinationConfig::new()).unwrap();
/// use logferry::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Rollback failed for job {}", 7);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use logferry::prelude::*;
/// # let dest = MemoryDestination::new(Box::new(RawFormat::new()));
/// # let mut logger = Logger::new(Box::new(dest)).with_run_level(Level::Info);
/// # logger.open(&DestinationConfig::new()).unwrap();
/// use logferry::info;
/// info!(logger, "Cache warmed");
/// info!(logger, "Loaded {} routes", 42);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Info, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Notice, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use logferry::prelude::*;
/// # let dest = MemoryDestination::new(Box::new(RawFormat::new()));
/// # let mut logger = Logger::new(Box::new(dest));
/// # logger.open(&DestinationConfig::new()).unwrap();
/// use logferry::error;
/// error!(logger, "Payment gateway unreachable");
/// error!(logger, "Request failed with status {}", 502);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Critical, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Alert, $($arg)+)
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Emergency, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{DestinationConfig, Level, Logger, Mux};
    use crate::destinations::{MemoryBuffer, MemoryDestination};
    use crate::format::RawFormat;

    fn memory_logger(level: Level) -> (Logger, MemoryBuffer) {
        let dest = MemoryDestination::new(Box::new(RawFormat::new()));
        let buffer = dest.buffer();
        let mut logger = Logger::new(Box::new(dest)).with_run_level(level);
        logger.open(&DestinationConfig::new()).unwrap();
        (logger, buffer)
    }

    #[test]
    fn test_log_macro_formats_arguments() {
        let (mut logger, buffer) = memory_logger(Level::Debug);

        log!(logger, Level::Info, "plain message");
        log!(logger, Level::Error, "code: {}", 500);

        let data = buffer.contents();
        assert!(data.contains("plain message"));
        assert!(data.contains("code: 500"));
    }

    #[test]
    fn test_level_macros() {
        let (mut logger, buffer) = memory_logger(Level::Debug);

        debug!(logger, "d={}", 1);
        info!(logger, "i={}", 2);
        notice!(logger, "n={}", 3);
        warning!(logger, "w={}", 4);
        error!(logger, "e={}", 5);
        critical!(logger, "c={}", 6);
        alert!(logger, "a={}", 7);
        emergency!(logger, "m={}", 8);

        let data = buffer.contents();
        for expected in ["d=1", "i=2", "n=3", "w=4", "e=5", "c=6", "a=7", "m=8"] {
            assert!(data.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_macros_respect_threshold() {
        let (mut logger, buffer) = memory_logger(Level::Warning);

        info!(logger, "too quiet");
        warning!(logger, "loud enough");

        let data = buffer.contents();
        assert!(!data.contains("too quiet"));
        assert!(data.contains("loud enough"));
    }

    #[test]
    fn test_macros_work_on_a_mux() {
        let dest = MemoryDestination::new(Box::new(RawFormat::new()));
        let buffer = dest.buffer();
        let mut logger = Logger::new(Box::new(dest)).with_run_level(Level::Debug);
        logger.open(&DestinationConfig::new()).unwrap();

        let mut mux = Mux::new();
        mux.add_log(logger);

        info!(mux, "through the mux: {}", 9);
        assert!(buffer.contents().contains("through the mux: 9"));
    }
}
