// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Engine-side state of one resource or data source.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ProviderError, Result};

/// Attribute values plus the remote id, as persisted by the engine.
///
/// Lifecycle callbacks read the operator's configuration from here and write
/// the refreshed remote state back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl ResourceData {
    /// Create empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state from a JSON object of attributes.
    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style id setter.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    /// Remote id, `None` while the resource is absent.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Remote id, or `MissingId` while the resource is absent.
    pub fn require_id(&self) -> Result<&str> {
        self.id().filter(|id| !id.is_empty()).ok_or(ProviderError::MissingId)
    }

    /// Record the remote id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as absent.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Raw attribute value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    /// All attributes.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Set an attribute.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// String attribute. Errors if present with another type.
    pub fn get_string(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(ProviderError::invalid(
                name,
                format!("expected string, got {}", other),
            )),
        }
    }

    /// Integer attribute. Errors if present with another type.
    pub fn get_int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| ProviderError::invalid(name, format!("expected integer, got {}", value))),
        }
    }

    /// String attribute, treating the empty string as unset.
    pub fn get_ok_string(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.get_string(name)?.filter(|s| !s.is_empty()))
    }

    /// Integer attribute, treating zero as unset.
    pub fn get_ok_int(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.get_int(name)?.filter(|n| *n != 0))
    }
}
