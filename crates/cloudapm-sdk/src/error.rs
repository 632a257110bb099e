// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for cloudapm-sdk.

use thiserror::Error;

/// Result type using CloudError.
pub type Result<T> = std::result::Result<T, CloudError>;

/// Where a failure originated.
///
/// The kind is fixed when the error is constructed so retry decisions never
/// depend on inspecting the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or connectivity failure before a usable response arrived.
    Transport,
    /// The remote API answered with an error object.
    Api,
    /// A local invariant was violated (bad config, malformed response).
    Logic,
}

/// Errors that can occur when talking to the APM control plane.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloudError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection, TLS or HTTP-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request timed out.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// The remote API rejected the request.
    #[error("api error [{code}]: {message} (request id: {request_id})")]
    Api {
        /// Error code reported by the API, e.g. `InvalidParameter`.
        code: String,
        /// Human readable message reported by the API.
        message: String,
        /// Request id assigned by the API, empty when absent.
        request_id: String,
    },

    /// The API accepted the call but a required response field was missing.
    #[error("{action} succeeded but returned no {field}")]
    MissingField {
        /// Remote action name.
        action: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Request signing failed.
    #[error("signing error: {0}")]
    Signing(String),
}

impl CloudError {
    /// Classify the error by origin.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::Transport(_) | CloudError::Timeout(_) => ErrorKind::Transport,
            CloudError::Api { .. } => ErrorKind::Api,
            CloudError::Config(_)
            | CloudError::MissingField { .. }
            | CloudError::Serialization(_)
            | CloudError::Signing(_) => ErrorKind::Logic,
        }
    }

    /// Only transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

impl From<serde_json::Error> for CloudError {
    fn from(err: serde_json::Error) -> Self {
        CloudError::Serialization(err.to_string())
    }
}
