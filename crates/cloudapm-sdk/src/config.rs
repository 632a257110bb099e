// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the APM control-plane client.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::{CloudError, Result};

/// Default region when `TENCENTCLOUD_REGION` is unset.
pub const DEFAULT_REGION: &str = "ap-guangzhou";

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://apm.tencentcloudapi.com";

/// Default per-action admission rate (requests per second).
pub const DEFAULT_RATE_LIMIT: NonZeroU32 = match NonZeroU32::new(20) {
    Some(rate) => rate,
    None => NonZeroU32::MIN,
};

/// Configuration for the cloud client.
#[derive(Clone)]
pub struct CloudConfig {
    /// Access key id.
    pub secret_id: String,
    /// Access key secret. Never logged.
    pub secret_key: String,
    /// Region the instances live in.
    pub region: String,
    /// Service endpoint URL (scheme and host, optionally a port).
    pub endpoint: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Admission rate per remote action.
    pub rate_limit: NonZeroU32,
}

impl fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudConfig")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("request_timeout", &self.request_timeout)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl CloudConfig {
    /// Create a configuration with the given credentials and default values.
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            region: DEFAULT_REGION.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(30),
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TENCENTCLOUD_SECRET_ID`: access key id (required)
    /// - `TENCENTCLOUD_SECRET_KEY`: access key secret (required)
    /// - `TENCENTCLOUD_REGION`: region (default: "ap-guangzhou")
    /// - `TENCENTCLOUD_APM_ENDPOINT`: endpoint URL (default: "https://apm.tencentcloudapi.com")
    /// - `TENCENTCLOUD_REQUEST_TIMEOUT_MS`: request timeout in milliseconds (default: 30000)
    /// - `TENCENTCLOUD_RATE_LIMIT`: requests per second per action (default: 20)
    pub fn from_env() -> Result<Self> {
        let secret_id = std::env::var("TENCENTCLOUD_SECRET_ID")
            .map_err(|_| CloudError::Config("TENCENTCLOUD_SECRET_ID is required".to_string()))?;

        let secret_key = std::env::var("TENCENTCLOUD_SECRET_KEY")
            .map_err(|_| CloudError::Config("TENCENTCLOUD_SECRET_KEY is required".to_string()))?;

        let region =
            std::env::var("TENCENTCLOUD_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());

        let endpoint = std::env::var("TENCENTCLOUD_APM_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let request_timeout_ms: u64 = std::env::var("TENCENTCLOUD_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse()
            .map_err(|e| {
                CloudError::Config(format!("invalid TENCENTCLOUD_REQUEST_TIMEOUT_MS: {}", e))
            })?;

        let rate_limit: NonZeroU32 = std::env::var("TENCENTCLOUD_RATE_LIMIT")
            .unwrap_or_else(|_| DEFAULT_RATE_LIMIT.to_string())
            .parse()
            .map_err(|e| CloudError::Config(format!("invalid TENCENTCLOUD_RATE_LIMIT: {}", e)))?;

        let config = Self {
            secret_id,
            secret_key,
            region,
            endpoint,
            request_timeout: Duration::from_millis(request_timeout_ms),
            rate_limit,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that required values are present.
    pub fn validate(&self) -> Result<()> {
        if self.secret_id.trim().is_empty() {
            return Err(CloudError::Config("secret id must not be empty".to_string()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(CloudError::Config("secret key must not be empty".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(CloudError::Config("region must not be empty".to_string()));
        }
        Ok(())
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the per-action admission rate.
    pub fn with_rate_limit(mut self, per_second: NonZeroU32) -> Self {
        self.rate_limit = per_second;
        self
    }
}
