// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The `tencentcloud_apm_agent` data source: agent endpoints of an instance.

use std::sync::Arc;

use async_trait::async_trait;
use cloudapm_sdk::{ApiRequest, ApmService, DescribeApmAgentRequest, RequestContext};
use tracing::{error, instrument};

use crate::elapsed::ElapsedGuard;
use crate::error::{ProviderError, Result};
use crate::lifecycle::DataSource;
use crate::retry::RetryPolicy;
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;

pub const ATTR_INSTANCE_ID: &str = "instance_id";

pub struct ApmAgentDataSource {
    service: Arc<ApmService>,
    retry: RetryPolicy,
}

impl ApmAgentDataSource {
    pub fn new(service: Arc<ApmService>, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }

    pub fn schema_definition() -> Schema {
        Schema::new("Use this data source to query the agent endpoints of an APM instance.")
            .with_attribute(ATTR_INSTANCE_ID, Attribute::required_string("Instance id."))
            .with_attribute(
                "agent_download_url",
                Attribute::computed_string("Agent download URL."),
            )
            .with_attribute("collector_url", Attribute::computed_string("Collector URL."))
            .with_attribute(
                "inner_collector_url",
                Attribute::computed_string("Collector URL reachable inside the cloud network."),
            )
            .with_attribute(
                "private_link_collector_url",
                Attribute::computed_string("Collector URL over private link."),
            )
            .with_attribute(
                "public_collector_url",
                Attribute::computed_string("Public collector URL."),
            )
            .with_attribute("token", Attribute::computed_string("Reporting token."))
    }
}

#[async_trait]
impl DataSource for ApmAgentDataSource {
    fn schema(&self) -> Schema {
        Self::schema_definition()
    }

    #[instrument(skip_all)]
    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let _elapsed = ElapsedGuard::new("data_source.tencentcloud_apm_agent.read");
        let ctx = RequestContext::new();
        let instance_id = data
            .get_string(ATTR_INSTANCE_ID)?
            .ok_or_else(|| ProviderError::MissingAttribute(ATTR_INSTANCE_ID.to_string()))?
            .to_string();

        let service = &self.service;
        let agent = {
            let (ctx, instance_id) = (&ctx, instance_id.as_str());
            self.retry
                .run(
                    self.retry.read_timeout,
                    DescribeApmAgentRequest::ACTION,
                    move || service.describe_agent_info(ctx, instance_id),
                )
                .await
                .and_then(|found| {
                    found.ok_or_else(|| ProviderError::NotFound {
                        kind: "apm agent",
                        id: instance_id.to_string(),
                    })
                })
                .inspect_err(|e| {
                    error!(
                        log_id = %ctx.log_id(),
                        instance_id,
                        error = %e,
                        "APM agent lookup failed"
                    );
                })?
        };

        data.set_id(instance_id.as_str());
        data.set("agent_download_url", agent.agent_download_url);
        data.set("collector_url", agent.collector_url);
        data.set("inner_collector_url", agent.inner_collector_url);
        data.set("private_link_collector_url", agent.private_link_collector_url);
        data.set("public_collector_url", agent.public_collector_url);
        data.set("token", agent.token);
        Ok(())
    }
}
