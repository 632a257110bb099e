// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Lifecycle traits implemented by resource types and data sources.

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::Schema;
use crate::state::ResourceData;

/// A managed resource type.
///
/// Each callback receives the engine's state for one resource and mutates it
/// in place. Clearing the id tells the engine the resource no longer exists.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Attribute declarations.
    fn schema(&self) -> Schema;

    /// Create the remote object and populate state from it.
    async fn create(&self, data: &mut ResourceData) -> Result<()>;

    /// Refresh state from the remote object.
    async fn read(&self, data: &mut ResourceData) -> Result<()>;

    /// Apply planned changes.
    async fn update(&self, data: &mut ResourceData) -> Result<()>;

    /// Remove the resource from management.
    async fn delete(&self, data: &mut ResourceData) -> Result<()>;
}

/// A read-only lookup.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Attribute declarations.
    fn schema(&self) -> Schema;

    /// Populate computed attributes from the remote side.
    async fn read(&self, data: &mut ResourceData) -> Result<()>;
}
