// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The `tencentcloud_apm` resource type.
//!
//! Instances are create-only: the remote API offers no modify or terminate
//! action, so update refuses drift on any attribute and delete only releases
//! the instance from management.

use std::sync::Arc;

use async_trait::async_trait;
use cloudapm_sdk::{
    ApiRequest, ApmInstanceDetail, ApmService, CreateApmInstanceRequest, DescribeApmInstancesRequest,
    RequestContext,
};
use tracing::{error, info, instrument, warn};

use crate::elapsed::ElapsedGuard;
use crate::error::{ProviderError, Result};
use crate::lifecycle::Resource;
use crate::retry::RetryPolicy;
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;

pub const ATTR_NAME: &str = "name";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_TRACE_DURATION: &str = "trace_duration";
pub const ATTR_SPAN_DAILY_COUNTERS: &str = "span_daily_counters";

/// Reconciler for APM instances.
pub struct ApmInstanceResource {
    service: Arc<ApmService>,
    retry: RetryPolicy,
}

impl ApmInstanceResource {
    pub fn new(service: Arc<ApmService>, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }

    /// Attribute declarations, available without a service.
    pub fn schema_definition() -> Schema {
        Schema::new("Provides a resource to create an APM instance.")
            .with_attribute(ATTR_NAME, Attribute::required_string("Name of the instance."))
            .with_attribute(
                ATTR_DESCRIPTION,
                Attribute::optional_string("Description of the instance."),
            )
            .with_attribute(
                ATTR_TRACE_DURATION,
                Attribute::optional_int("Trace retention in days."),
            )
            .with_attribute(
                ATTR_SPAN_DAILY_COUNTERS,
                Attribute::optional_int("Daily span quota. 0 means unlimited."),
            )
    }

    /// Describe an instance inside the read retry window.
    async fn describe(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<Option<ApmInstanceDetail>> {
        let service = &self.service;
        self.retry
            .run(
                self.retry.read_timeout,
                DescribeApmInstancesRequest::ACTION,
                move || service.describe_instance(ctx, instance_id),
            )
            .await
    }
}

/// Build the create request from configuration. Empty and zero values are
/// treated as unset.
fn create_request(data: &ResourceData) -> Result<CreateApmInstanceRequest> {
    let name = data
        .get_string(ATTR_NAME)?
        .ok_or_else(|| ProviderError::MissingAttribute(ATTR_NAME.to_string()))?;

    let mut request = CreateApmInstanceRequest::new(name);
    if let Some(description) = data.get_ok_string(ATTR_DESCRIPTION)? {
        request = request.with_description(description);
    }
    if let Some(days) = data.get_ok_int(ATTR_TRACE_DURATION)? {
        request = request.with_trace_duration(days);
    }
    if let Some(counters) = planned_span_daily_counters(data)? {
        request = request.with_span_daily_counters(counters);
    }
    Ok(request)
}

fn planned_span_daily_counters(data: &ResourceData) -> Result<Option<u64>> {
    span_daily_counters(data.get_ok_int(ATTR_SPAN_DAILY_COUNTERS)?)
}

fn span_daily_counters(value: Option<i64>) -> Result<Option<u64>> {
    value
        .map(|n| {
            u64::try_from(n)
                .map_err(|_| ProviderError::invalid(ATTR_SPAN_DAILY_COUNTERS, "must not be negative"))
        })
        .transpose()
}

fn apply_detail(data: &mut ResourceData, detail: &ApmInstanceDetail) {
    data.set(ATTR_NAME, detail.name.as_str());
    data.set(ATTR_DESCRIPTION, detail.description.as_str());
    data.set(ATTR_TRACE_DURATION, detail.trace_duration);
    data.set(ATTR_SPAN_DAILY_COUNTERS, detail.span_daily_counters);
}

fn check_unchanged<T>(field: &'static str, current: &T, planned: Option<&T>) -> Result<()>
where
    T: PartialEq + ToString + ?Sized,
{
    match planned {
        Some(planned) if planned != current => Err(ProviderError::ImmutableField {
            field,
            current: current.to_string(),
            planned: planned.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Reject any configured value that differs from the remote instance.
///
/// Empty strings and zeros count as values here: clearing an attribute is a
/// change like any other.
fn check_immutable(data: &ResourceData, detail: &ApmInstanceDetail) -> Result<()> {
    check_unchanged(ATTR_NAME, detail.name.as_str(), data.get_string(ATTR_NAME)?)?;
    check_unchanged(
        ATTR_DESCRIPTION,
        detail.description.as_str(),
        data.get_string(ATTR_DESCRIPTION)?,
    )?;
    check_unchanged(
        ATTR_TRACE_DURATION,
        &detail.trace_duration,
        data.get_int(ATTR_TRACE_DURATION)?.as_ref(),
    )?;
    check_unchanged(
        ATTR_SPAN_DAILY_COUNTERS,
        &detail.span_daily_counters,
        span_daily_counters(data.get_int(ATTR_SPAN_DAILY_COUNTERS)?)?.as_ref(),
    )
}

fn log_failure(ctx: &RequestContext, operation: &str, instance_id: &str, err: &ProviderError) {
    error!(
        log_id = %ctx.log_id(),
        operation,
        instance_id,
        error = %err,
        "APM instance operation failed"
    );
}

#[async_trait]
impl Resource for ApmInstanceResource {
    fn schema(&self) -> Schema {
        Self::schema_definition()
    }

    #[instrument(skip_all)]
    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let _elapsed = ElapsedGuard::new("resource.tencentcloud_apm.create");
        let ctx = RequestContext::new();

        let request = create_request(data)?;
        let service = &self.service;
        let instance_id = {
            let (ctx, request) = (&ctx, &request);
            self.retry
                .run(
                    self.retry.write_timeout,
                    CreateApmInstanceRequest::ACTION,
                    move || service.create_instance(ctx, request),
                )
                .await
                .inspect_err(|e| {
                    error!(
                        log_id = %ctx.log_id(),
                        name = %request.name,
                        error = %e,
                        "Create APM instance failed"
                    );
                })?
        };

        info!(log_id = %ctx.log_id(), instance_id = %instance_id, "APM instance created");
        data.set_id(instance_id.as_str());

        let detail = self
            .describe(&ctx, &instance_id)
            .await
            .and_then(|found| {
                found.ok_or_else(|| ProviderError::NotFound {
                    kind: "apm instance",
                    id: instance_id.clone(),
                })
            })
            .inspect_err(|e| log_failure(&ctx, "create", &instance_id, e))?;

        apply_detail(data, &detail);
        Ok(())
    }

    #[instrument(skip_all, fields(instance_id = ?data.id()))]
    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let _elapsed = ElapsedGuard::new("resource.tencentcloud_apm.read");
        let ctx = RequestContext::new();
        let instance_id = data.require_id()?.to_string();

        let found = self
            .describe(&ctx, &instance_id)
            .await
            .inspect_err(|e| log_failure(&ctx, "read", &instance_id, e))?;
        match found {
            Some(detail) => apply_detail(data, &detail),
            None => {
                warn!(
                    log_id = %ctx.log_id(),
                    instance_id = %instance_id,
                    "APM instance no longer exists, removing from state"
                );
                data.clear_id();
            }
        }
        Ok(())
    }

    #[instrument(skip_all, fields(instance_id = ?data.id()))]
    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let _elapsed = ElapsedGuard::new("resource.tencentcloud_apm.update");
        let ctx = RequestContext::new();
        let instance_id = data.require_id()?.to_string();

        let detail = self
            .describe(&ctx, &instance_id)
            .await
            .and_then(|found| {
                found.ok_or_else(|| ProviderError::NotFound {
                    kind: "apm instance",
                    id: instance_id.clone(),
                })
            })
            .and_then(|detail| check_immutable(data, &detail).map(|()| detail))
            .inspect_err(|e| log_failure(&ctx, "update", &instance_id, e))?;

        apply_detail(data, &detail);
        Ok(())
    }

    #[instrument(skip_all, fields(instance_id = ?data.id()))]
    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let _elapsed = ElapsedGuard::new("resource.tencentcloud_apm.delete");
        let ctx = RequestContext::new();
        let instance_id = data.require_id()?.to_string();

        let found = self
            .describe(&ctx, &instance_id)
            .await
            .inspect_err(|e| log_failure(&ctx, "delete", &instance_id, e))?;
        if found.is_some() {
            warn!(
                log_id = %ctx.log_id(),
                instance_id = %instance_id,
                "APM instances cannot be terminated through the API; the instance is retained remotely"
            );
        }
        data.clear_id();
        Ok(())
    }
}
