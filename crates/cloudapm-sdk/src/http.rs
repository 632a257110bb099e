// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP transport for the APM control-plane API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::api::ApmApi;
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::sign::{self, CONTENT_TYPE, SigningRequest};
use crate::types::{
    ApiRequest, CreateApmInstanceRequest, CreateApmInstanceResponse, DescribeApmAgentRequest,
    DescribeApmAgentResponse, DescribeApmInstancesRequest, DescribeApmInstancesResponse,
};

/// Service name used in the credential scope.
pub const SERVICE: &str = "apm";

/// API version sent with every request.
pub const API_VERSION: &str = "2021-06-22";

/// Signed JSON-over-HTTPS transport.
pub struct HttpApmApi {
    client: reqwest::Client,
    config: CloudConfig,
    url: Url,
    host: String,
}

impl HttpApmApi {
    /// Create a transport for the given configuration.
    pub fn new(config: CloudConfig) -> Result<Self> {
        config.validate()?;

        let url = Url::parse(&config.endpoint)
            .map_err(|e| CloudError::Config(format!("invalid endpoint {}: {}", config.endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(CloudError::Config(format!(
                    "endpoint {} has no host",
                    config.endpoint
                )));
            }
        };

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CloudError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            url,
            host,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    async fn call<Req, Resp>(&self, request: &Req) -> Result<Resp>
    where
        Req: ApiRequest,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_string(request)?;
        let timestamp = Utc::now().timestamp();
        let authorization = sign::authorization(&SigningRequest {
            secret_id: &self.config.secret_id,
            secret_key: &self.config.secret_key,
            service: SERVICE,
            host: &self.host,
            action: Req::ACTION,
            payload: &payload,
            timestamp,
        })?;

        trace!(action = Req::ACTION, host = %self.host, "Sending signed request");

        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", CONTENT_TYPE)
            .header("Authorization", authorization)
            .header("X-TC-Action", Req::ACTION)
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Region", &self.config.region)
            .header("X-TC-Timestamp", timestamp.to_string())
            .body(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(CloudError::Transport(format!(
                "{} returned HTTP {}: {}",
                Req::ACTION,
                status.as_u16(),
                body
            )));
        }

        parse_envelope(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> CloudError {
        if err.is_timeout() {
            CloudError::Timeout(millis(self.config.request_timeout))
        } else {
            CloudError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ApmApi for HttpApmApi {
    async fn create_apm_instance(
        &self,
        request: &CreateApmInstanceRequest,
    ) -> Result<CreateApmInstanceResponse> {
        self.call(request).await
    }

    async fn describe_apm_instances(
        &self,
        request: &DescribeApmInstancesRequest,
    ) -> Result<DescribeApmInstancesResponse> {
        self.call(request).await
    }

    async fn describe_apm_agent(
        &self,
        request: &DescribeApmAgentRequest,
    ) -> Result<DescribeApmAgentResponse> {
        self.call(request).await
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Unwrap the `{"Response": {...}}` envelope, turning an embedded `Error`
/// object into `CloudError::Api`.
pub(crate) fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.response.get("Error") {
        let error: ErrorBody = serde_json::from_value(error.clone())?;
        let request_id = envelope
            .response
            .get("RequestId")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        return Err(CloudError::Api {
            code: error.code,
            message: error.message,
            request_id,
        });
    }

    Ok(serde_json::from_value(envelope.response)?)
}
