//! Bounded retry policy for decryption failures
//!
//! A persistently corrupted stream (wrong key, damaged link) would otherwise
//! starve a caller that waits for the next successfully decrypted telegram.
//! The policy bounds how many consecutive telegrams may fail authentication
//! before the failure is surfaced.

use std::time::Duration;

/// Retry policy applied when a telegram fails authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of telegrams attempted per call, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Create a retry policy
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            backoff,
        }
    }

    /// Policy that surfaces the first authentication failure immediately
    pub const fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    /// Three attempts with a 100 ms pause between them
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}
