// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type tests for cloudapm-sdk.

use cloudapm_sdk::{CloudError, ErrorKind};

#[test]
fn test_config_error_display() {
    let err = CloudError::Config("missing secret".to_string());
    assert!(err.to_string().contains("configuration error"));
    assert!(err.to_string().contains("missing secret"));
    assert_eq!(err.kind(), ErrorKind::Logic);
}

#[test]
fn test_transport_error_display() {
    let err = CloudError::Transport("connection refused".to_string());
    assert!(err.to_string().contains("transport error"));
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn test_timeout_error_display() {
    let err = CloudError::Timeout(5000);
    assert!(err.to_string().contains("timed out"));
    assert!(err.to_string().contains("5000"));
    assert!(err.is_retryable());
}

#[test]
fn test_api_error_display() {
    let err = CloudError::Api {
        code: "LimitExceeded".to_string(),
        message: "quota exhausted".to_string(),
        request_id: "req-77".to_string(),
    };
    let display = err.to_string();
    assert!(display.contains("api error"));
    assert!(display.contains("LimitExceeded"));
    assert!(display.contains("quota exhausted"));
    assert!(display.contains("req-77"));
}

#[test]
fn test_missing_field_error_display() {
    let err = CloudError::MissingField {
        action: "CreateApmInstance",
        field: "InstanceId",
    };
    let display = err.to_string();
    assert!(display.contains("CreateApmInstance"));
    assert!(display.contains("InstanceId"));
}

#[test]
fn test_from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: CloudError = json_err.into();
    assert!(matches!(err, CloudError::Serialization(_)));
    assert!(!err.is_retryable());
}
