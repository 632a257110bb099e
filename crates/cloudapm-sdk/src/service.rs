// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ApmService: domain operations over the APM control-plane API.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::api::ApmApi;
use crate::context::RequestContext;
use crate::error::{CloudError, Result};
use crate::ratelimit::RateLimiter;
use crate::types::{
    AgentInfo, ApiRequest, ApmInstanceDetail, CreateApmInstanceRequest, DescribeApmAgentRequest,
    DescribeApmInstancesRequest,
};

/// Agent technology sent with every `DescribeApmAgent` call.
///
/// The API misbehaves when this parameter varies, and the token and collector
/// endpoints it returns do not depend on it, so the value is pinned. Drop the
/// constant and take the type from the caller once the API accepts any type.
pub const AGENT_TYPE: &str = "go";

/// Single point of translation between domain calls and the wire API.
///
/// Every call waits for rate-limit admission keyed by the remote action, then
/// logs the outbound request together with the response or the failure.
#[derive(Clone)]
pub struct ApmService {
    api: Arc<dyn ApmApi>,
    limiter: Arc<dyn RateLimiter>,
}

impl ApmService {
    /// Create a service over the given transport and shared limiter.
    pub fn new(api: Arc<dyn ApmApi>, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { api, limiter }
    }

    /// Look up one instance by id.
    ///
    /// Returns `Ok(None)` when the API lists no matching instance. If several
    /// are listed, the first wins.
    #[instrument(skip(self, ctx), fields(log_id = %ctx.log_id()))]
    pub async fn describe_instance(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<Option<ApmInstanceDetail>> {
        let request = DescribeApmInstancesRequest::by_id(instance_id);

        self.limiter.check(DescribeApmInstancesRequest::ACTION).await;
        let response = self
            .api
            .describe_apm_instances(&request)
            .await
            .inspect_err(|e| audit_failure(ctx, &request, e))?;
        audit_success(ctx, &request, &response);

        Ok(response.instances.into_iter().next())
    }

    /// Fetch the agent endpoint set for an instance.
    ///
    /// Always requests [`AGENT_TYPE`]. Returns `Ok(None)` when the instance has
    /// no agent configuration.
    #[instrument(skip(self, ctx), fields(log_id = %ctx.log_id()))]
    pub async fn describe_agent_info(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<Option<AgentInfo>> {
        let request = DescribeApmAgentRequest {
            instance_id: instance_id.to_string(),
            agent_type: AGENT_TYPE.to_string(),
        };

        self.limiter.check(DescribeApmAgentRequest::ACTION).await;
        let response = self
            .api
            .describe_apm_agent(&request)
            .await
            .inspect_err(|e| audit_failure(ctx, &request, e))?;
        audit_success(ctx, &request, &response);

        Ok(response.apm_agent.map(AgentInfo::from))
    }

    /// Create an instance and return its id.
    ///
    /// A success response without an id is reported as
    /// `CloudError::MissingField`.
    #[instrument(skip(self, ctx, request), fields(log_id = %ctx.log_id(), name = %request.name))]
    pub async fn create_instance(
        &self,
        ctx: &RequestContext,
        request: &CreateApmInstanceRequest,
    ) -> Result<String> {
        self.limiter.check(CreateApmInstanceRequest::ACTION).await;
        let response = self
            .api
            .create_apm_instance(request)
            .await
            .inspect_err(|e| audit_failure(ctx, request, e))?;
        audit_success(ctx, request, &response);

        match response.instance_id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => {
                let err = CloudError::MissingField {
                    action: CreateApmInstanceRequest::ACTION,
                    field: "InstanceId",
                };
                error!(log_id = %ctx.log_id(), error = %err, "Create returned no instance id");
                Err(err)
            }
        }
    }
}

fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

fn audit_failure<Req: ApiRequest>(ctx: &RequestContext, request: &Req, err: &CloudError) {
    error!(
        log_id = %ctx.log_id(),
        action = Req::ACTION,
        request = %render(request),
        reason = %err,
        "API call failed"
    );
}

fn audit_success<Req: ApiRequest, Resp: Serialize>(
    ctx: &RequestContext,
    request: &Req,
    response: &Resp,
) {
    debug!(
        log_id = %ctx.log_id(),
        action = Req::ACTION,
        request = %render(request),
        response = %render(response),
        "API call succeeded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApmApi;
    use crate::ratelimit::NoopRateLimiter;
    use crate::types::ApmAgentInfo;
    use serde_json::json;

    fn service() -> (Arc<MockApmApi>, ApmService) {
        let mock = Arc::new(MockApmApi::new());
        let service = ApmService::new(mock.clone(), Arc::new(NoopRateLimiter));
        (mock, service)
    }

    #[tokio::test]
    async fn test_describe_unknown_instance_is_absent() {
        let (mock, service) = service();
        let ctx = RequestContext::new();

        let result = service.describe_instance(&ctx, "ins-missing").await.unwrap();
        assert!(result.is_none());

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].body, json!({"InstanceIds": ["ins-missing"]}));
    }

    #[tokio::test]
    async fn test_describe_agent_pins_agent_type() {
        let (mock, service) = service();
        let ctx = RequestContext::new();
        mock.insert_agent(
            "ins-1",
            ApmAgentInfo {
                token: Some("tok".to_string()),
                ..ApmAgentInfo::default()
            },
        )
        .await;

        let agent = service.describe_agent_info(&ctx, "ins-1").await.unwrap();
        assert_eq!(agent.unwrap().token, "tok");

        let calls = mock.calls().await;
        assert_eq!(calls[0].action, "DescribeApmAgent");
        assert_eq!(calls[0].body["AgentType"], json!("go"));
    }

    #[tokio::test]
    async fn test_describe_agent_without_configuration_is_absent() {
        let (_mock, service) = service();
        let ctx = RequestContext::new();
        assert!(service.describe_agent_info(&ctx, "ins-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_without_id_is_logic_error() {
        let mock = Arc::new(MockApmApi::without_instance_ids());
        let service = ApmService::new(mock, Arc::new(NoopRateLimiter));
        let ctx = RequestContext::new();

        let err = service
            .create_instance(&ctx, &CreateApmInstanceRequest::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::MissingField { field: "InstanceId", .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_api_errors_propagate_unchanged() {
        let (mock, service) = service();
        let ctx = RequestContext::new();
        let rejection = CloudError::Api {
            code: "AuthFailure".to_string(),
            message: "signature expired".to_string(),
            request_id: "req-3".to_string(),
        };
        mock.set_error("DescribeApmInstances", rejection.clone()).await;

        let err = service.describe_instance(&ctx, "ins-1").await.unwrap_err();
        assert_eq!(err, rejection);
    }

    #[derive(Default)]
    struct RecordingLimiter {
        actions: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl RateLimiter for RecordingLimiter {
        async fn check(&self, action: &str) {
            self.actions.lock().unwrap().push(action.to_string());
        }
    }

    #[tokio::test]
    async fn test_every_call_is_admitted_by_action() {
        let mock = Arc::new(MockApmApi::new());
        let limiter = Arc::new(RecordingLimiter::default());
        let service = ApmService::new(mock.clone(), limiter.clone());
        let ctx = RequestContext::new();

        let id = service
            .create_instance(&ctx, &CreateApmInstanceRequest::new("test"))
            .await
            .unwrap();
        service.describe_instance(&ctx, &id).await.unwrap();
        service.describe_agent_info(&ctx, &id).await.unwrap();

        assert_eq!(
            *limiter.actions.lock().unwrap(),
            vec!["CreateApmInstance", "DescribeApmInstances", "DescribeApmAgent"]
        );
        assert_eq!(mock.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_call_still_passes_admission() {
        let mock = Arc::new(MockApmApi::new());
        let limiter = Arc::new(RecordingLimiter::default());
        let service = ApmService::new(mock.clone(), limiter.clone());
        mock.set_error("DescribeApmAgent", CloudError::Transport("reset".to_string()))
            .await;

        assert!(service
            .describe_agent_info(&RequestContext::new(), "ins-1")
            .await
            .is_err());
        assert_eq!(*limiter.actions.lock().unwrap(), vec!["DescribeApmAgent"]);
    }
}
