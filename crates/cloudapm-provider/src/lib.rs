// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! cloudapm provider
//!
//! Declarative-engine plugin for cloud APM instances.
//!
//! # Resources
//!
//! - `tencentcloud_apm` ([`ApmInstanceResource`]): create-only APM instance.
//!   Update rejects attribute drift and delete releases the instance from
//!   management without terminating it.
//!
//! # Data sources
//!
//! - `tencentcloud_apm_agent` ([`ApmAgentDataSource`]): agent download URL,
//!   collector endpoints and reporting token of an existing instance.
//!
//! Every remote call runs inside a [`RetryPolicy`] window. API rejections and
//! logic errors fail on the first attempt; transport failures are retried
//! until the window closes.

mod data_source_apm_agent;
mod elapsed;
mod error;
mod lifecycle;
mod provider;
mod resource_apm;
mod retry;
mod schema;
mod state;

pub use data_source_apm_agent::ApmAgentDataSource;
pub use elapsed::ElapsedGuard;
pub use error::{ProviderError, Result};
pub use lifecycle::{DataSource, Resource};
pub use provider::{DATA_SOURCE_APM_AGENT, Provider, RESOURCE_APM};
pub use resource_apm::ApmInstanceResource;
pub use retry::RetryPolicy;
pub use schema::{Attribute, AttributeMode, AttributeType, Schema};
pub use state::ResourceData;
