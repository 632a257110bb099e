// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for cloudapm-provider.

use cloudapm_sdk::CloudError;
use thiserror::Error;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors surfaced to the operator by a lifecycle callback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// A non-retryable remote or client failure.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// Transient failures persisted until the retry window closed.
    #[error("{operation} did not succeed within {timeout_ms}ms after {attempts} attempts: {last_error}")]
    RetryTimeout {
        /// Remote action that kept failing.
        operation: String,
        /// Retry window in milliseconds.
        timeout_ms: u64,
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last_error: CloudError,
    },

    /// The referenced remote object does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up.
        kind: &'static str,
        /// Identifier used for the lookup.
        id: String,
    },

    /// A required attribute was not supplied.
    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    /// An attribute has the wrong type or an out-of-range value.
    #[error("invalid attribute {name}: {reason}")]
    InvalidAttribute {
        /// Attribute name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The configuration asks to change a field that cannot change remotely.
    #[error("attribute {field} cannot be changed after creation (current: {current}, planned: {planned})")]
    ImmutableField {
        /// Attribute name.
        field: &'static str,
        /// Value held by the remote instance.
        current: String,
        /// Value requested by the configuration.
        planned: String,
    },

    /// The operation needs a resource id but the state has none.
    #[error("resource has no id; it must be created first")]
    MissingId,

    /// No resource type is registered under this name.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// No data source is registered under this name.
    #[error("unknown data source: {0}")]
    UnknownDataSource(String),
}

impl ProviderError {
    /// Shorthand for [`ProviderError::InvalidAttribute`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::InvalidAttribute {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
