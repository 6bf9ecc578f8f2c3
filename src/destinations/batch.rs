//! Batch accumulation and bounded-retry delivery
//!
//! The HTTP destinations share one batching discipline: entries queue in a
//! [`BatchBuffer`] until it reaches capacity, the full batch is taken out
//! before any send attempt, and the send itself runs under a bounded
//! [`RetryPolicy`]. A batch that exhausts its retries is dropped and counted,
//! never re-queued, so a dead endpoint cannot grow the buffer without bound.

use crate::core::backoff::{retry_with_backoff, RetryPolicy};
use crate::core::{diag, DeliveryError, DeliveryMetrics, DestinationConfig, LogError, Result};
use crate::destinations::transport::{HttpRequest, HttpTransport};

/// Parse the `max_retries` / `retry_delay` keys every HTTP destination honors.
///
/// `max_retries` floors at 1 (there is always a first attempt) and defaults to
/// 3; `retry_delay` defaults to 1.0s and must be non-negative.
pub(crate) fn retry_policy_from(name: &str, config: &DestinationConfig) -> Result<RetryPolicy> {
    let max_attempts = config.get_u32("max_retries").unwrap_or(3).max(1);
    let base_delay = config.get_f64("retry_delay").unwrap_or(1.0);
    if base_delay < 0.0 {
        return Err(LogError::config(name, "retry_delay must be non-negative"));
    }
    Ok(RetryPolicy::new(max_attempts, base_delay))
}

/// Validate an http(s) endpoint URL at `open` time.
pub(crate) fn parse_endpoint(name: &str, endpoint: &str) -> Result<()> {
    match url::Url::parse(endpoint) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(LogError::url(name, endpoint)),
    }
}

/// Fixed-capacity accumulator for pending batch entries.
///
/// `push` hands back the drained batch the moment it reaches `batch_size`, so
/// the buffer never holds more than `batch_size` entries. A `batch_size` of 1
/// (or 0, which is clamped) makes every push an immediate single-entry batch.
#[derive(Debug)]
pub struct BatchBuffer {
    batch_size: usize,
    entries: Vec<serde_json::Value>,
}

impl BatchBuffer {
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size,
            entries: Vec::with_capacity(batch_size),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue one entry, returning the full batch once capacity is reached.
    pub fn push(&mut self, entry: serde_json::Value) -> Option<Vec<serde_json::Value>> {
        self.entries.push(entry);
        if self.entries.len() >= self.batch_size {
            Some(std::mem::take(&mut self.entries))
        } else {
            None
        }
    }

    /// Take whatever is queued. `None` when nothing is pending.
    pub fn drain(&mut self) -> Option<Vec<serde_json::Value>> {
        if self.entries.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.entries))
        }
    }
}

/// Send one request under the retry policy, updating metrics for the batch.
///
/// A response with a failure status counts as a failed attempt just like a
/// transport error. Returns whether the batch was delivered; on permanent
/// failure the `count` messages it carried are recorded as dropped and the
/// last error goes to the diagnostic channel.
pub(crate) fn deliver_with_retry(
    name: &str,
    transport: &dyn HttpTransport,
    request: &HttpRequest,
    count: u64,
    policy: &RetryPolicy,
    metrics: &DeliveryMetrics,
) -> bool {
    let mut first = true;
    let outcome = retry_with_backoff(policy, || {
        if first {
            first = false;
        } else {
            metrics.record_retry();
        }
        let response = transport.post(request)?;
        if response.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::status(response.status, response.body))
        }
    });

    match outcome {
        Ok(()) => {
            metrics.record_delivered_n(count);
            true
        }
        Err(err) => {
            diag(name, format!("dropped {count} message(s): {err}"));
            metrics.record_dropped_n(count);
            false
        }
    }
}
