//! Connection lifecycle state shared by socket destinations

use super::backoff::{next_delay, with_jitter, RetryPolicy};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Reconnect bookkeeping for a persistent-socket destination.
///
/// Tracks the connection state plus a consecutive-failure counter. Once the
/// counter reaches the policy ceiling no further attempts are made (writes
/// drop) until [`Reconnector::reset`]. A successful connect resets the
/// counter to zero.
#[derive(Debug, Clone)]
pub struct Reconnector {
    state: ConnectionState,
    attempts: u32,
    policy: RetryPolicy,
    jitter: bool,
}

impl Reconnector {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempts: 0,
            policy,
            jitter: false,
        }
    }

    /// Enable random jitter on reconnect delays
    #[must_use]
    pub fn with_jitter(mut self, enable: bool) -> Self {
        self.jitter = enable;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Consecutive failed reconnect attempts since the last success
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Whether the attempt ceiling has been reached
    pub fn exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }

    /// Record a successful connect: connected, counter back to zero.
    pub fn mark_connected(&mut self) {
        self.state = ConnectionState::Connected;
        self.attempts = 0;
    }

    pub fn mark_disconnected(&mut self) {
        self.state = ConnectionState::Disconnected;
    }

    /// Forget all failure history (manual reopen).
    pub fn reset(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.attempts = 0;
    }

    /// Start one reconnect attempt.
    ///
    /// Returns `false` immediately when the ceiling is reached: no attempt
    /// is made and no time is spent. Otherwise increments the counter and
    /// blocks for the backoff delay; the caller then performs the actual
    /// connect and reports the outcome via [`Reconnector::mark_connected`].
    pub fn begin_attempt(&mut self) -> bool {
        if self.exhausted() {
            return false;
        }
        self.attempts += 1;
        let mut delay = next_delay(self.attempts, self.policy.base_delay, self.policy.cap);
        if self.jitter {
            delay = with_jitter(delay);
        }
        if delay > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(delay));
        }
        true
    }
}
