//! Error types for the delivery pipeline
//!
//! Two policies by origin:
//! - [`LogError`]: configuration mistakes, surfaced loudly at `open()` time.
//! - [`DeliveryError`]: runtime transport failures, contained inside
//!   destinations and never propagated to the logging caller.

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Missing required configuration key
    #[error("Missing required parameter '{key}' for {destination}")]
    MissingParameter { destination: String, key: String },

    /// A provided setting that fails validation
    #[error("Invalid configuration for {destination}: {message}")]
    InvalidConfiguration {
        destination: String,
        message: String,
    },

    /// Malformed endpoint URL
    #[error("Invalid URL for {destination}: '{url}'")]
    InvalidUrl { destination: String, url: String },

    /// Unrecognized run level text
    #[error("Unrecognized run level: '{0}'")]
    InvalidRunLevel(String),

    /// IO failure surfaced at open time
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Payload serialization failure
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Shorthand for [`LogError::MissingParameter`].
    pub fn missing(destination: impl Into<String>, key: impl Into<String>) -> Self {
        LogError::MissingParameter {
            destination: destination.into(),
            key: key.into(),
        }
    }

    /// Shorthand for [`LogError::InvalidConfiguration`].
    pub fn config(destination: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::InvalidConfiguration {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`LogError::InvalidUrl`].
    pub fn url(destination: impl Into<String>, url: impl Into<String>) -> Self {
        LogError::InvalidUrl {
            destination: destination.into(),
            url: url.into(),
        }
    }

    /// Shorthand for [`LogError::Other`].
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LogError::Other(msg.into())
    }
}

/// Transport failure inside a destination.
///
/// Returned by internal send functions so failures stay visible to the
/// destination's own bookkeeping; at the `write` boundary they become a state
/// transition plus a dropped-message count, never a propagated error.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Socket-level failure (connect, read, write)
    #[error("IO failure: {0}")]
    Io(#[from] std::io::Error),

    /// Remote answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Protocol handshake was refused or malformed
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// Transport rejected the request before any response
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl DeliveryError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        DeliveryError::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn handshake(msg: impl Into<String>) -> Self {
        DeliveryError::Handshake(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        DeliveryError::Rejected(msg.into())
    }
}
