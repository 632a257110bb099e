// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Registry dispatch and schema validation.

use std::sync::Arc;

use cloudapm_provider::{
    AttributeMode, AttributeType, DATA_SOURCE_APM_AGENT, Provider, ProviderError, RESOURCE_APM,
    ResourceData, RetryPolicy,
};
use cloudapm_sdk::mock::MockApmApi;
use cloudapm_sdk::{ApmService, CloudConfig, NoopRateLimiter};

fn provider() -> (Arc<MockApmApi>, Provider) {
    let mock = Arc::new(MockApmApi::new());
    let service = Arc::new(ApmService::new(mock.clone(), Arc::new(NoopRateLimiter)));
    (mock, Provider::new(service, RetryPolicy::default()))
}

#[test]
fn test_registered_types() {
    let (_mock, provider) = provider();
    assert_eq!(provider.resource_types(), vec!["tencentcloud_apm"]);
    assert_eq!(provider.data_source_types(), vec!["tencentcloud_apm_agent"]);
}

#[test]
fn test_resource_schema() {
    let (_mock, provider) = provider();
    let schema = provider.resource_schema(RESOURCE_APM).unwrap();

    let name = schema.attribute("name").unwrap();
    assert_eq!(name.ty, AttributeType::String);
    assert_eq!(name.mode, AttributeMode::Required);
    assert_eq!(schema.attribute("description").unwrap().mode, AttributeMode::Optional);
    assert_eq!(schema.attribute("trace_duration").unwrap().ty, AttributeType::Int);
    assert_eq!(schema.attribute("span_daily_counters").unwrap().ty, AttributeType::Int);
    assert_eq!(schema.attributes.len(), 4);
}

#[test]
fn test_data_source_schema() {
    let (_mock, provider) = provider();
    let schema = provider.data_source_schema(DATA_SOURCE_APM_AGENT).unwrap();

    assert_eq!(schema.attribute("instance_id").unwrap().mode, AttributeMode::Required);
    for computed in [
        "agent_download_url",
        "collector_url",
        "inner_collector_url",
        "private_link_collector_url",
        "public_collector_url",
        "token",
    ] {
        assert_eq!(
            schema.attribute(computed).unwrap().mode,
            AttributeMode::Computed,
            "{} should be computed",
            computed
        );
    }
}

#[tokio::test]
async fn test_unknown_types_are_rejected() {
    let (_mock, provider) = provider();
    let mut data = ResourceData::new();

    assert!(matches!(
        provider.create("tencentcloud_cvm", &mut data).await,
        Err(ProviderError::UnknownResourceType(name)) if name == "tencentcloud_cvm"
    ));
    assert!(matches!(
        provider.read_data_source("tencentcloud_cvm", &mut data).await,
        Err(ProviderError::UnknownDataSource(_))
    ));
}

#[tokio::test]
async fn test_create_validates_before_any_remote_call() {
    let (mock, provider) = provider();

    let mut missing_name = ResourceData::new().with("description", "x");
    assert!(matches!(
        provider.create(RESOURCE_APM, &mut missing_name).await,
        Err(ProviderError::MissingAttribute(name)) if name == "name"
    ));

    let mut wrong_type = ResourceData::new()
        .with("name", "test")
        .with("trace_duration", "fifteen");
    assert!(matches!(
        provider.create(RESOURCE_APM, &mut wrong_type).await,
        Err(ProviderError::InvalidAttribute { .. })
    ));

    assert!(mock.calls().await.is_empty());
}

#[tokio::test]
async fn test_data_source_rejects_computed_input() {
    let (mock, provider) = provider();
    let mut data = ResourceData::new()
        .with("instance_id", "ins-1")
        .with("token", "forged");

    let err = provider
        .read_data_source(DATA_SOURCE_APM_AGENT, &mut data)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidAttribute { .. }));
    assert!(mock.calls().await.is_empty());
}

#[tokio::test]
async fn test_full_lifecycle_through_registry() {
    let (mock, provider) = provider();
    let mut data = ResourceData::new().with("name", "test");

    provider.create(RESOURCE_APM, &mut data).await.unwrap();
    assert_eq!(data.id(), Some("ins-1"));

    provider.read(RESOURCE_APM, &mut data).await.unwrap();
    provider.update(RESOURCE_APM, &mut data).await.unwrap();
    provider.delete(RESOURCE_APM, &mut data).await.unwrap();
    assert!(data.id().is_none());

    assert_eq!(mock.call_count("CreateApmInstance").await, 1);
    assert_eq!(mock.call_count("DescribeApmInstances").await, 4);
}

#[test]
fn test_from_config_rejects_missing_credentials() {
    let config = CloudConfig::new("", "");
    assert!(matches!(
        Provider::from_config(&config, RetryPolicy::default()),
        Err(ProviderError::Cloud(_))
    ));
}
