// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bounded retry loop around remote calls.
//!
//! Non-retryable errors (API rejections, logic errors) abort after the first
//! attempt. Transport errors are retried with exponential backoff until the
//! window closes, at which point the last error is surfaced.

use std::future::Future;
use std::time::Duration;

use cloudapm_sdk::CloudError;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};

/// Retry windows and backoff bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Window for read calls (describe).
    pub read_timeout: Duration,
    /// Window for write calls (create).
    pub write_timeout: Duration,
    /// Delay before the second attempt.
    pub initial_interval: Duration,
    /// Upper bound for the delay between attempts.
    pub max_interval: Duration,
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(3 * 60),
            write_timeout: Duration::from_secs(5 * 60),
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read window.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the write window.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the backoff bounds.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_interval = initial;
        self.max_interval = max.max(initial);
        self
    }

    /// Run `attempt` until it succeeds, fails permanently, or `timeout` elapses.
    pub async fn run<T, F, Fut>(&self, timeout: Duration, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, CloudError>>,
    {
        let started = Instant::now();
        let mut delay = self.initial_interval;
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            let err = match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => {
                    debug!(operation, attempts, error = %err, "Non-retryable error, giving up");
                    return Err(err.into());
                }
                Err(err) => err,
            };

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(ProviderError::RetryTimeout {
                    operation: operation.to_string(),
                    timeout_ms: millis(timeout),
                    attempts,
                    last_error: err,
                });
            }

            let wait = delay.min(timeout - elapsed);
            warn!(
                operation,
                attempts,
                wait_ms = millis(wait),
                error = %err,
                "Retryable error, backing off"
            );
            tokio::time::sleep(wait).await;
            delay = delay.saturating_mul(2).min(self.max_interval);
        }
    }
}
