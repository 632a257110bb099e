// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock transport for testing.
//!
//! Keeps instances and agent configurations in memory and records every
//! call so tests can assert on exactly what reached the "remote" side.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::api::ApmApi;
use crate::error::{CloudError, Result};
use crate::types::{
    ApiRequest, ApmAgentInfo, ApmInstanceDetail, CreateApmInstanceRequest,
    CreateApmInstanceResponse, DescribeApmAgentRequest, DescribeApmAgentResponse,
    DescribeApmInstancesRequest, DescribeApmInstancesResponse,
};

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Remote action name.
    pub action: &'static str,
    /// Request body as JSON.
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    instances: HashMap<String, ApmInstanceDetail>,
    agents: HashMap<String, ApmAgentInfo>,
    calls: Vec<RecordedCall>,
    queued_errors: HashMap<&'static str, VecDeque<CloudError>>,
    sticky_errors: HashMap<&'static str, CloudError>,
}

/// In-memory stand-in for the APM control plane.
pub struct MockApmApi {
    state: Mutex<MockState>,
    next_id: AtomicU64,
    /// If true, `CreateApmInstance` succeeds but omits the instance id.
    pub omit_instance_id: bool,
}

impl Default for MockApmApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApmApi {
    /// Create an empty mock. Created instances are numbered `ins-1`, `ins-2`, ...
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            next_id: AtomicU64::new(1),
            omit_instance_id: false,
        }
    }

    /// Create a mock whose create call never returns an id.
    pub fn without_instance_ids() -> Self {
        Self {
            omit_instance_id: true,
            ..Self::new()
        }
    }

    /// Seed an existing instance.
    pub async fn insert_instance(&self, detail: ApmInstanceDetail) {
        let mut state = self.state.lock().await;
        state.instances.insert(detail.instance_id.clone(), detail);
    }

    /// Remove an instance, as if deleted out of band.
    pub async fn remove_instance(&self, instance_id: &str) {
        self.state.lock().await.instances.remove(instance_id);
    }

    /// Seed agent configuration for an instance.
    pub async fn insert_agent(&self, instance_id: &str, agent: ApmAgentInfo) {
        let mut state = self.state.lock().await;
        state.agents.insert(instance_id.to_string(), agent);
    }

    /// Fail the next call to `action` with `err`, once.
    pub async fn push_error(&self, action: &'static str, err: CloudError) {
        let mut state = self.state.lock().await;
        state.queued_errors.entry(action).or_default().push_back(err);
    }

    /// Fail every call to `action` with `err` until cleared.
    pub async fn set_error(&self, action: &'static str, err: CloudError) {
        self.state.lock().await.sticky_errors.insert(action, err);
    }

    /// Stop failing calls to `action`.
    pub async fn clear_error(&self, action: &'static str) {
        let mut state = self.state.lock().await;
        state.sticky_errors.remove(action);
        state.queued_errors.remove(action);
    }

    /// All calls observed so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of calls observed for `action`.
    pub async fn call_count(&self, action: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| call.action == action)
            .count()
    }

    /// Record the call and return any injected failure for it.
    fn record<Req: ApiRequest>(&self, state: &mut MockState, request: &Req) -> Result<()> {
        state.calls.push(RecordedCall {
            action: Req::ACTION,
            body: to_value(request)?,
        });

        if let Some(err) = state
            .queued_errors
            .get_mut(Req::ACTION)
            .and_then(VecDeque::pop_front)
        {
            return Err(err);
        }
        match state.sticky_errors.get(Req::ACTION) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[async_trait]
impl ApmApi for MockApmApi {
    async fn create_apm_instance(
        &self,
        request: &CreateApmInstanceRequest,
    ) -> Result<CreateApmInstanceResponse> {
        let mut state = self.state.lock().await;
        self.record(&mut state, request)?;

        let instance_id = format!("ins-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        state.instances.insert(
            instance_id.clone(),
            ApmInstanceDetail {
                instance_id: instance_id.clone(),
                name: request.name.clone(),
                description: request.description.clone().unwrap_or_default(),
                trace_duration: request.trace_duration.unwrap_or_default(),
                span_daily_counters: request.span_daily_counters.unwrap_or_default(),
                ..ApmInstanceDetail::default()
            },
        );

        Ok(CreateApmInstanceResponse {
            instance_id: (!self.omit_instance_id).then_some(instance_id),
            request_id: Some("mock-request".to_string()),
        })
    }

    async fn describe_apm_instances(
        &self,
        request: &DescribeApmInstancesRequest,
    ) -> Result<DescribeApmInstancesResponse> {
        let mut state = self.state.lock().await;
        self.record(&mut state, request)?;

        let instances = request
            .instance_ids
            .iter()
            .filter_map(|id| state.instances.get(id).cloned())
            .collect();

        Ok(DescribeApmInstancesResponse {
            instances,
            request_id: Some("mock-request".to_string()),
        })
    }

    async fn describe_apm_agent(
        &self,
        request: &DescribeApmAgentRequest,
    ) -> Result<DescribeApmAgentResponse> {
        let mut state = self.state.lock().await;
        self.record(&mut state, request)?;

        Ok(DescribeApmAgentResponse {
            apm_agent: state.agents.get(&request.instance_id).cloned(),
            request_id: Some("mock-request".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let mock = MockApmApi::new();
        let first = mock
            .create_apm_instance(&CreateApmInstanceRequest::new("a"))
            .await
            .unwrap();
        let second = mock
            .create_apm_instance(&CreateApmInstanceRequest::new("b"))
            .await
            .unwrap();
        assert_eq!(first.instance_id.as_deref(), Some("ins-1"));
        assert_eq!(second.instance_id.as_deref(), Some("ins-2"));
    }

    #[tokio::test]
    async fn test_queued_error_fires_once() {
        let mock = MockApmApi::new();
        mock.push_error(
            DescribeApmInstancesRequest::ACTION,
            CloudError::Transport("reset".to_string()),
        )
        .await;

        let request = DescribeApmInstancesRequest::by_id("ins-1");
        assert!(mock.describe_apm_instances(&request).await.is_err());
        assert!(mock.describe_apm_instances(&request).await.is_ok());
        assert_eq!(mock.call_count(DescribeApmInstancesRequest::ACTION).await, 2);
    }
}
