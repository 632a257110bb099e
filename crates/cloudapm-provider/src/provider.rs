// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider registry: routes lifecycle calls to resource types and data
//! sources by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use cloudapm_sdk::{ApmService, CloudConfig, HttpApmApi, TokenBucketLimiter};
use tracing::{debug, info};

use crate::data_source_apm_agent::ApmAgentDataSource;
use crate::error::{ProviderError, Result};
use crate::lifecycle::{DataSource, Resource};
use crate::resource_apm::ApmInstanceResource;
use crate::retry::RetryPolicy;
use crate::schema::Schema;
use crate::state::ResourceData;

/// Resource type name of APM instances.
pub const RESOURCE_APM: &str = "tencentcloud_apm";

/// Data source name of the agent lookup.
pub const DATA_SOURCE_APM_AGENT: &str = "tencentcloud_apm_agent";

/// All resource types and data sources served by this plugin.
pub struct Provider {
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSource>>,
}

impl Provider {
    /// Register every resource type and data source over one service.
    pub fn new(service: Arc<ApmService>, retry: RetryPolicy) -> Self {
        let mut resources: BTreeMap<&'static str, Box<dyn Resource>> = BTreeMap::new();
        resources.insert(
            RESOURCE_APM,
            Box::new(ApmInstanceResource::new(service.clone(), retry)),
        );

        let mut data_sources: BTreeMap<&'static str, Box<dyn DataSource>> = BTreeMap::new();
        data_sources.insert(
            DATA_SOURCE_APM_AGENT,
            Box::new(ApmAgentDataSource::new(service, retry)),
        );

        Self {
            resources,
            data_sources,
        }
    }

    /// Build a provider talking HTTP to the configured endpoint.
    pub fn from_config(config: &CloudConfig, retry: RetryPolicy) -> Result<Self> {
        config.validate()?;
        let limiter = Arc::new(TokenBucketLimiter::new(config.rate_limit));
        let api = Arc::new(HttpApmApi::new(config.clone())?);
        info!(
            region = %config.region,
            endpoint = %config.endpoint,
            rate_limit = config.rate_limit.get(),
            "Provider configured"
        );
        Ok(Self::new(Arc::new(ApmService::new(api, limiter)), retry))
    }

    /// Registered resource type names.
    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    /// Registered data source names.
    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    pub fn resource_schema(&self, type_name: &str) -> Result<Schema> {
        Ok(self.resource(type_name)?.schema())
    }

    pub fn data_source_schema(&self, type_name: &str) -> Result<Schema> {
        Ok(self.data_source(type_name)?.schema())
    }

    pub async fn create(&self, type_name: &str, data: &mut ResourceData) -> Result<()> {
        let resource = self.resource(type_name)?;
        resource.schema().validate_config(data)?;
        debug!(type_name, "Dispatching create");
        resource.create(data).await
    }

    pub async fn read(&self, type_name: &str, data: &mut ResourceData) -> Result<()> {
        debug!(type_name, "Dispatching read");
        self.resource(type_name)?.read(data).await
    }

    pub async fn update(&self, type_name: &str, data: &mut ResourceData) -> Result<()> {
        let resource = self.resource(type_name)?;
        resource.schema().validate_config(data)?;
        debug!(type_name, "Dispatching update");
        resource.update(data).await
    }

    pub async fn delete(&self, type_name: &str, data: &mut ResourceData) -> Result<()> {
        debug!(type_name, "Dispatching delete");
        self.resource(type_name)?.delete(data).await
    }

    pub async fn read_data_source(&self, type_name: &str, data: &mut ResourceData) -> Result<()> {
        let source = self.data_source(type_name)?;
        source.schema().validate_config(data)?;
        debug!(type_name, "Dispatching data source read");
        source.read(data).await
    }

    fn resource(&self, type_name: &str) -> Result<&dyn Resource> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataSource> {
        self.data_sources
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownDataSource(type_name.to_string()))
    }
}
