// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-operation correlation context.

use std::fmt;

/// Carries the correlation id that ties together every log line emitted
/// while servicing one lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    log_id: String,
}

impl RequestContext {
    /// Create a context with a freshly generated log id.
    pub fn new() -> Self {
        Self {
            log_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Create a context with a caller-chosen log id.
    pub fn with_log_id(log_id: impl Into<String>) -> Self {
        Self {
            log_id: log_id.into(),
        }
    }

    /// The correlation id.
    pub fn log_id(&self) -> &str {
        &self.log_id
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log_id)
    }
}
