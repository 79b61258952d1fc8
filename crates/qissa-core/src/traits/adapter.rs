// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait implemented by every Qissa adapter.

use async_trait::async_trait;

use crate::error::QissaError;
use crate::types::{AdapterKind, HealthStatus};

/// The base trait for all Qissa adapters.
///
/// Every adapter (identity verifier, text generator, video backend, ledger)
/// implements this trait, which provides identity, health check, and
/// shutdown capabilities.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the kind of adapter (auth, generator, video backend, ledger).
    fn kind(&self) -> AdapterKind;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, QissaError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), QissaError> {
        Ok(())
    }
}
