// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request and response types for the APM control-plane API.
//!
//! Field names follow the API's PascalCase JSON convention.

use serde::{Deserialize, Serialize};

/// A request that maps to exactly one remote action.
pub trait ApiRequest: Serialize + Send + Sync {
    /// Remote action name sent in the `X-TC-Action` header.
    const ACTION: &'static str;
}

// =========================================================================
// CreateApmInstance
// =========================================================================

/// Request body for `CreateApmInstance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApmInstanceRequest {
    /// Instance name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Trace retention in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_duration: Option<i64>,
    /// Daily span quota.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_daily_counters: Option<u64>,
}

impl CreateApmInstanceRequest {
    /// Create a request for an instance with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            trace_duration: None,
            span_daily_counters: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the trace retention.
    pub fn with_trace_duration(mut self, days: i64) -> Self {
        self.trace_duration = Some(days);
        self
    }

    /// Set the daily span quota.
    pub fn with_span_daily_counters(mut self, counters: u64) -> Self {
        self.span_daily_counters = Some(counters);
        self
    }
}

impl ApiRequest for CreateApmInstanceRequest {
    const ACTION: &'static str = "CreateApmInstance";
}

/// Response body for `CreateApmInstance`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApmInstanceResponse {
    /// Identifier of the new instance.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Request id assigned by the API.
    #[serde(default)]
    pub request_id: Option<String>,
}

// =========================================================================
// DescribeApmInstances
// =========================================================================

/// Request body for `DescribeApmInstances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeApmInstancesRequest {
    /// Instance ids to filter on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instance_ids: Vec<String>,
}

impl DescribeApmInstancesRequest {
    /// Filter by a single instance id.
    pub fn by_id(instance_id: impl Into<String>) -> Self {
        Self {
            instance_ids: vec![instance_id.into()],
        }
    }
}

impl ApiRequest for DescribeApmInstancesRequest {
    const ACTION: &'static str = "DescribeApmInstances";
}

/// Response body for `DescribeApmInstances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeApmInstancesResponse {
    /// Matching instances.
    #[serde(default)]
    pub instances: Vec<ApmInstanceDetail>,
    /// Request id assigned by the API.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// An APM instance as reported by the API.
///
/// Attributes the API omits decode to their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApmInstanceDetail {
    /// Instance id.
    #[serde(default)]
    pub instance_id: String,
    /// Instance name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Trace retention in days.
    #[serde(default)]
    pub trace_duration: i64,
    /// Daily span quota.
    #[serde(default)]
    pub span_daily_counters: u64,
    /// Lifecycle status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Owning account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
}

// =========================================================================
// DescribeApmAgent
// =========================================================================

/// Request body for `DescribeApmAgent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeApmAgentRequest {
    /// Instance id.
    pub instance_id: String,
    /// Agent technology, see [`crate::AGENT_TYPE`].
    pub agent_type: String,
}

impl ApiRequest for DescribeApmAgentRequest {
    const ACTION: &'static str = "DescribeApmAgent";
}

/// Response body for `DescribeApmAgent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeApmAgentResponse {
    /// Agent configuration, absent when none exists yet.
    #[serde(default)]
    pub apm_agent: Option<ApmAgentInfo>,
    /// Request id assigned by the API.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Agent endpoints and token as reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApmAgentInfo {
    /// Agent download URL.
    #[serde(rename = "AgentDownloadURL", default)]
    pub agent_download_url: Option<String>,
    /// Default collector URL.
    #[serde(rename = "CollectorURL", default)]
    pub collector_url: Option<String>,
    /// Collector URL inside the cloud network.
    #[serde(rename = "InnerCollectorURL", default)]
    pub inner_collector_url: Option<String>,
    /// Collector URL over private link.
    #[serde(rename = "PrivateLinkCollectorURL", default)]
    pub private_link_collector_url: Option<String>,
    /// Public collector URL.
    #[serde(rename = "PublicCollectorURL", default)]
    pub public_collector_url: Option<String>,
    /// Reporting token.
    #[serde(rename = "Token", default)]
    pub token: Option<String>,
}

/// Agent endpoint set with missing fields normalised to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub agent_download_url: String,
    pub collector_url: String,
    pub inner_collector_url: String,
    pub private_link_collector_url: String,
    pub public_collector_url: String,
    pub token: String,
}

impl From<ApmAgentInfo> for AgentInfo {
    fn from(info: ApmAgentInfo) -> Self {
        Self {
            agent_download_url: info.agent_download_url.unwrap_or_default(),
            collector_url: info.collector_url.unwrap_or_default(),
            inner_collector_url: info.inner_collector_url.unwrap_or_default(),
            private_link_collector_url: info.private_link_collector_url.unwrap_or_default(),
            public_collector_url: info.public_collector_url.unwrap_or_default(),
            token: info.token.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_omits_unset_fields() {
        let request = CreateApmInstanceRequest::new("test");
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"Name": "test"}));

        let request = CreateApmInstanceRequest::new("test")
            .with_description("checkout")
            .with_trace_duration(15)
            .with_span_daily_counters(20);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "Name": "test",
                "Description": "checkout",
                "TraceDuration": 15,
                "SpanDailyCounters": 20
            })
        );
    }

    #[test]
    fn test_instance_detail_defaults_missing_attributes() {
        let detail: ApmInstanceDetail =
            serde_json::from_value(json!({"InstanceId": "ins-1", "Name": "test"})).unwrap();
        assert_eq!(detail.instance_id, "ins-1");
        assert_eq!(detail.name, "test");
        assert_eq!(detail.description, "");
        assert_eq!(detail.trace_duration, 0);
        assert_eq!(detail.span_daily_counters, 0);
    }

    #[test]
    fn test_agent_info_uses_url_suffix_names() {
        let response: DescribeApmAgentResponse = serde_json::from_value(json!({
            "ApmAgent": {
                "AgentDownloadURL": "https://dl/agent.tar.gz",
                "CollectorURL": "http://collector",
                "Token": "tok"
            },
            "RequestId": "req-9"
        }))
        .unwrap();

        let info = AgentInfo::from(response.apm_agent.unwrap());
        assert_eq!(info.agent_download_url, "https://dl/agent.tar.gz");
        assert_eq!(info.collector_url, "http://collector");
        assert_eq!(info.inner_collector_url, "");
        assert_eq!(info.token, "tok");
    }
}
