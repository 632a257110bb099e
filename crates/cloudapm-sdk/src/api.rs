// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transport trait for the APM control-plane API.
//!
//! One method per remote action. Implementations only move requests and
//! responses across the wire; rate limiting, logging and interpretation of
//! empty results live in [`crate::ApmService`].

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CreateApmInstanceRequest, CreateApmInstanceResponse, DescribeApmAgentRequest,
    DescribeApmAgentResponse, DescribeApmInstancesRequest, DescribeApmInstancesResponse,
};

/// Wire-level access to the APM service.
///
/// Errors must already be classified: an error object returned by the API is
/// `CloudError::Api`, anything that prevented a response is
/// `CloudError::Transport` or `CloudError::Timeout`.
#[async_trait]
pub trait ApmApi: Send + Sync {
    /// Call `CreateApmInstance`.
    async fn create_apm_instance(
        &self,
        request: &CreateApmInstanceRequest,
    ) -> Result<CreateApmInstanceResponse>;

    /// Call `DescribeApmInstances`.
    async fn describe_apm_instances(
        &self,
        request: &DescribeApmInstancesRequest,
    ) -> Result<DescribeApmInstancesResponse>;

    /// Call `DescribeApmAgent`.
    async fn describe_apm_agent(
        &self,
        request: &DescribeApmAgentRequest,
    ) -> Result<DescribeApmAgentResponse>;
}
