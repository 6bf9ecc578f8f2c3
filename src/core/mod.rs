//! Core types and traits of the delivery pipeline

pub mod backoff;
pub mod config;
pub mod connection;
pub mod destination;
pub mod error;
pub mod filter;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod mux;
pub mod record;
pub mod value;

pub use backoff::{next_delay, retry_with_backoff, with_jitter, RetryPolicy, DEFAULT_DELAY_CAP};
pub use config::DestinationConfig;
pub use connection::{ConnectionState, Reconnector};
pub use destination::Destination;
pub use error::{DeliveryError, LogError, Result};
pub use filter::{apply_filters, Filter, RunLevelFilter};
pub use level::Level;
pub use logger::Logger;
pub use metrics::DeliveryMetrics;
pub use mux::{Mux, SharedLogger};
pub use record::{Context, Record};
pub use value::Value;

pub(crate) use destination::diag;
