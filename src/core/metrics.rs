//! Delivery metrics for observability
//!
//! Every destination owns one [`DeliveryMetrics`] so dropped messages are
//! observable the same way regardless of sink type.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing a destination's delivery history.
///
/// Counters are atomics so a snapshot can be read from another thread while
/// the owning logger keeps writing.
///
/// # Example
///
/// ```
/// use logferry::core::DeliveryMetrics;
///
/// let metrics = DeliveryMetrics::new();
/// metrics.record_delivered();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.delivered_count(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    /// Messages handed to the underlying transport successfully
    delivered: AtomicU64,

    /// Messages discarded after exhausted retries or while disconnected
    dropped: AtomicU64,

    /// Individual retry attempts across all sends
    retries: AtomicU64,

    /// Reconnect attempts made by socket destinations
    reconnects: AtomicU64,
}

impl DeliveryMetrics {
    /// All counters start at zero.
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn retry_count(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }

    /// Record a successful delivery of `count` messages
    #[inline]
    pub fn record_delivered_n(&self, count: u64) -> u64 {
        self.delivered.fetch_add(count, Ordering::Relaxed)
    }

    /// Record one successful delivery
    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.record_delivered_n(1)
    }

    /// Record `count` dropped messages
    #[inline]
    pub fn record_dropped_n(&self, count: u64) -> u64 {
        self.dropped.fetch_add(count, Ordering::Relaxed)
    }

    /// Record one dropped message
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.record_dropped_n(1)
    }

    /// Record one retry attempt
    #[inline]
    pub fn record_retry(&self) -> u64 {
        self.retries.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one reconnect attempt
    #[inline]
    pub fn record_reconnect(&self) -> u64 {
        self.reconnects.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let attempted = self.delivered_count() as f64 + dropped;
        if attempted == 0.0 {
            0.0
        } else {
            (dropped / attempted) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.retries.store(0, Ordering::Relaxed);
        self.reconnects.store(0, Ordering::Relaxed);
    }
}

impl Clone for DeliveryMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered_count()),
            dropped: AtomicU64::new(self.dropped_count()),
            retries: AtomicU64::new(self.retry_count()),
            reconnects: AtomicU64::new(self.reconnect_count()),
        }
    }
}
