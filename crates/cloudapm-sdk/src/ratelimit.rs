// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Admission control for outbound API calls.
//!
//! The control plane throttles per action, so admission is keyed by the
//! action name. One limiter is shared by every service in the process.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::http::millis;

/// Admission check performed before every remote call.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until a call to `action` may proceed.
    async fn check(&self, action: &str);
}

/// Limiter that admits everything immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    async fn check(&self, _action: &str) {}
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

/// Token bucket per action with a burst equal to the per-second rate.
#[derive(Debug)]
pub struct TokenBucketLimiter {
    per_second: NonZeroU32,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl TokenBucketLimiter {
    /// Create a limiter admitting `per_second` calls per action.
    pub fn new(per_second: NonZeroU32) -> Self {
        Self {
            per_second,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Take a token if one is available, otherwise report how long to wait.
    async fn try_acquire(&self, action: &str) -> Option<Duration> {
        let rate = f64::from(self.per_second.get());
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(action.to_string()).or_insert(Bucket {
            tokens: rate,
            refilled_at: now,
        });

        let elapsed = now.duration_since(bucket.refilled_at).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * rate).min(rate);
        bucket.refilled_at = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            None
        } else {
            Some(Duration::from_secs_f64((1.0 - bucket.tokens) / rate))
        }
    }
}

#[async_trait]
impl RateLimiter for TokenBucketLimiter {
    async fn check(&self, action: &str) {
        while let Some(wait) = self.try_acquire(action).await {
            debug!(action, wait_ms = millis(wait), "Rate limited, waiting");
            tokio::time::sleep(wait).await;
        }
    }
}
