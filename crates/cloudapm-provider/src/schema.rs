// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Attribute schemas registered with the declarative engine.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::state::ResourceData;

/// Attribute value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
}

/// Who supplies an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// The operator must supply it.
    Required,
    /// The operator may supply it.
    Optional,
    /// Only the provider sets it.
    Computed,
}

/// One attribute declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub mode: AttributeMode,
    pub description: &'static str,
}

impl Attribute {
    pub fn required_string(description: &'static str) -> Self {
        Self::new(AttributeType::String, AttributeMode::Required, description)
    }

    pub fn optional_string(description: &'static str) -> Self {
        Self::new(AttributeType::String, AttributeMode::Optional, description)
    }

    pub fn optional_int(description: &'static str) -> Self {
        Self::new(AttributeType::Int, AttributeMode::Optional, description)
    }

    pub fn computed_string(description: &'static str) -> Self {
        Self::new(AttributeType::String, AttributeMode::Computed, description)
    }

    fn new(ty: AttributeType, mode: AttributeMode, description: &'static str) -> Self {
        Self {
            ty,
            mode,
            description,
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self.ty {
            AttributeType::String => value.is_string(),
            AttributeType::Int => value.is_i64(),
        }
    }
}

/// Schema of a resource type or data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    /// Look up an attribute declaration.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Check operator-supplied configuration against the schema.
    ///
    /// Rejects unknown attributes, values of the wrong type, missing required
    /// attributes and any value for a computed attribute.
    pub fn validate_config(&self, data: &ResourceData) -> Result<()> {
        for (name, value) in data.attributes() {
            if value.is_null() {
                continue;
            }
            let attribute = self
                .attribute(name)
                .ok_or_else(|| ProviderError::invalid(name.as_str(), "unknown attribute"))?;
            if attribute.mode == AttributeMode::Computed {
                return Err(ProviderError::invalid(
                    name.as_str(),
                    "computed attribute cannot be set in configuration",
                ));
            }
            if !attribute.accepts(value) {
                return Err(ProviderError::invalid(
                    name.as_str(),
                    format!("expected {:?}, got {}", attribute.ty, value),
                ));
            }
        }

        for (name, attribute) in &self.attributes {
            if attribute.mode == AttributeMode::Required && data.get(name).is_none() {
                return Err(ProviderError::MissingAttribute((*name).to_string()));
            }
        }

        Ok(())
    }
}
