// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Failed lifecycle operations must log the error with the correlation id.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cloudapm_provider::{
    ApmAgentDataSource, ApmInstanceResource, DataSource, Resource, ResourceData, RetryPolicy,
};
use cloudapm_sdk::mock::MockApmApi;
use cloudapm_sdk::{ApmInstanceDetail, ApmService, CloudError, NoopRateLimiter};

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines_containing(&self, needle: &str) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

fn service(mock: &Arc<MockApmApi>) -> Arc<ApmService> {
    Arc::new(ApmService::new(mock.clone(), Arc::new(NoopRateLimiter)))
}

fn retry() -> RetryPolicy {
    RetryPolicy::new()
        .with_read_timeout(Duration::from_secs(2))
        .with_backoff(Duration::from_millis(100), Duration::from_millis(500))
}

fn assert_logged_with_log_id(logs: &CapturedLogs, message: &str) {
    let lines = logs.lines_containing(message);
    assert!(!lines.is_empty(), "no log line containing {:?}", message);
    assert!(
        lines.iter().all(|line| line.contains("ERROR") && line.contains("log_id=")),
        "missing level or log_id: {:?}",
        lines
    );
}

#[tokio::test(start_paused = true)]
async fn test_read_retry_timeout_is_logged() {
    let (logs, _guard) = capture();
    let mock = Arc::new(MockApmApi::new());
    mock.set_error(
        "DescribeApmInstances",
        CloudError::Transport("connection reset".to_string()),
    )
    .await;
    let resource = ApmInstanceResource::new(service(&mock), retry());
    let mut data = ResourceData::new().with_id("ins-1");

    assert!(resource.read(&mut data).await.is_err());

    assert_logged_with_log_id(&logs, "APM instance operation failed");
    let failure = logs.lines_containing("APM instance operation failed");
    assert!(failure.iter().any(|line| line.contains("did not succeed within")));
}

#[tokio::test]
async fn test_rejected_update_is_logged() {
    let (logs, _guard) = capture();
    let mock = Arc::new(MockApmApi::new());
    mock.insert_instance(ApmInstanceDetail {
        instance_id: "ins-1".to_string(),
        name: "checkout".to_string(),
        ..ApmInstanceDetail::default()
    })
    .await;
    let resource = ApmInstanceResource::new(service(&mock), retry());
    let mut data = ResourceData::new().with_id("ins-1").with("name", "renamed");

    assert!(resource.update(&mut data).await.is_err());

    assert_logged_with_log_id(&logs, "APM instance operation failed");
}

#[tokio::test]
async fn test_delete_api_error_is_logged() {
    let (logs, _guard) = capture();
    let mock = Arc::new(MockApmApi::new());
    mock.set_error(
        "DescribeApmInstances",
        CloudError::Api {
            code: "AuthFailure".to_string(),
            message: "signature expired".to_string(),
            request_id: "req-1".to_string(),
        },
    )
    .await;
    let resource = ApmInstanceResource::new(service(&mock), retry());
    let mut data = ResourceData::new().with_id("ins-1");

    assert!(resource.delete(&mut data).await.is_err());

    assert_logged_with_log_id(&logs, "APM instance operation failed");
    assert_eq!(data.id(), Some("ins-1"));
}

#[tokio::test]
async fn test_missing_agent_is_logged() {
    let (logs, _guard) = capture();
    let mock = Arc::new(MockApmApi::new());
    let source = ApmAgentDataSource::new(service(&mock), retry());
    let mut data = ResourceData::new().with("instance_id", "ins-1");

    assert!(source.read(&mut data).await.is_err());

    assert_logged_with_log_id(&logs, "APM agent lookup failed");
}
