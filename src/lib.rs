//! # logferry
//!
//! A structured logging library whose core is the delivery pipeline: every
//! destination ferries formatted records to somewhere else (a file, a syslog
//! collector, a WebSocket stream, a queue, a chat webhook) and owns the
//! reliability semantics of that trip.
//!
//! ## Features
//!
//! - **Leveled, structured records**: eight severity levels, typed context
//!   fields, per-logger channels
//! - **Pluggable formats**: plain text, JSON, CSV, HTML, Slack markdown,
//!   Nightwatch API JSON
//! - **Reliable socket sinks**: reconnect with capped exponential backoff
//!   (Papertrail-style syslog over TCP/TLS, WebSocket)
//! - **Batching HTTP sinks**: bounded retry with backoff (SQS, Nightwatch,
//!   Slack, generic webhooks)
//! - **Contained failures**: a logging call never panics or propagates a
//!   transport error; drops are counted and visible via [`DeliveryMetrics`]
//!
//! ## Quick start
//!
//! ```
//! use logferry::prelude::*;
//!
//! let destination = ConsoleDestination::new(Box::new(PlainTextFormat::new(true)));
//! let mut logger = Logger::new(Box::new(destination)).with_run_level(Level::Info);
//! logger.open(&DestinationConfig::new()).unwrap();
//!
//! logger.info("service started");
//! logger.error_with_context(
//!     "payment declined",
//!     Context::new().with_field("order_id", "ORD-1"),
//! );
//! ```

pub mod core;
pub mod destinations;
pub mod format;
pub mod macros;
pub mod wire;

pub mod prelude {
    pub use crate::core::{
        Context, DeliveryMetrics, Destination, DestinationConfig, Level, LogError, Logger, Mux,
        Record, Result, SharedLogger, Value,
    };
    pub use crate::destinations::{
        ConsoleDestination, FileDestination, MemoryDestination, NightwatchDestination,
        NullDestination, PapertrailDestination, SlackDestination, SqsDestination,
        SyslogUdpDestination, WebhookDestination, WebSocketDestination,
    };
    pub use crate::format::{
        CsvFormat, Format, HtmlFormat, JsonFormat, NightwatchFormat, PlainTextFormat, RawFormat,
        SlackFormat,
    };
}

pub use crate::core::{
    Context, DeliveryError, DeliveryMetrics, Destination, DestinationConfig, Level, LogError,
    Logger, Mux, Record, Result, RetryPolicy, SharedLogger, Value,
};
pub use crate::destinations::{
    ConsoleDestination, FileDestination, MemoryDestination, NightwatchDestination,
    NullDestination, PapertrailDestination, SlackDestination, SqsDestination,
    SyslogUdpDestination, WebhookDestination, WebSocketDestination,
};
pub use crate::format::Format;
