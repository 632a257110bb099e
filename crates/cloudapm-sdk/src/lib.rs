// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! cloudapm SDK
//!
//! Typed client for the cloud APM control-plane API.
//!
//! # Architecture
//!
//! - [`ApmApi`]: wire-level transport, one method per remote action.
//!   [`HttpApmApi`] signs and posts JSON; [`mock::MockApmApi`] keeps state in
//!   memory for tests.
//! - [`RateLimiter`]: admission check shared by every service in the process.
//! - [`ApmService`]: the domain operations (`describe_instance`,
//!   `describe_agent_info`, `create_instance`) with audit logging and
//!   absent-result handling.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cloudapm_sdk::{
//!     ApmService, CloudConfig, CreateApmInstanceRequest, HttpApmApi, RequestContext,
//!     TokenBucketLimiter,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CloudConfig::from_env()?;
//! let limiter = Arc::new(TokenBucketLimiter::new(config.rate_limit));
//! let service = ApmService::new(Arc::new(HttpApmApi::new(config)?), limiter);
//!
//! let ctx = RequestContext::new();
//! let id = service
//!     .create_instance(&ctx, &CreateApmInstanceRequest::new("checkout"))
//!     .await?;
//! let instance = service.describe_instance(&ctx, &id).await?;
//! println!("{:?}", instance);
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod context;
mod error;
mod http;
pub mod mock;
mod ratelimit;
mod service;
mod sign;
mod types;

pub use api::ApmApi;
pub use config::{CloudConfig, DEFAULT_ENDPOINT, DEFAULT_RATE_LIMIT, DEFAULT_REGION};
pub use context::RequestContext;
pub use error::{CloudError, ErrorKind, Result};
pub use http::{API_VERSION, HttpApmApi, SERVICE};
pub use ratelimit::{NoopRateLimiter, RateLimiter, TokenBucketLimiter};
pub use service::{AGENT_TYPE, ApmService};
pub use types::{
    AgentInfo, ApiRequest, ApmAgentInfo, ApmInstanceDetail, CreateApmInstanceRequest,
    CreateApmInstanceResponse, DescribeApmAgentRequest, DescribeApmAgentResponse,
    DescribeApmInstancesRequest, DescribeApmInstancesResponse,
};
