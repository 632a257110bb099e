// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Elapsed-time logging for lifecycle operations.

use std::time::Instant;

use tracing::debug;

use crate::retry::millis;

/// Logs how long an operation took when dropped.
///
/// ```ignore
/// let _elapsed = ElapsedGuard::new("resource.tencentcloud_apm.read");
/// ```
#[must_use = "the guard logs on drop; bind it to a named variable"]
pub struct ElapsedGuard {
    operation: &'static str,
    started: Instant,
}

impl ElapsedGuard {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            started: Instant::now(),
        }
    }
}

impl Drop for ElapsedGuard {
    fn drop(&mut self) {
        debug!(
            operation = self.operation,
            elapsed_ms = millis(self.started.elapsed()),
            "Operation finished"
        );
    }
}
