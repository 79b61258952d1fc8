// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity verification trait.

use async_trait::async_trait;

use crate::error::QissaError;
use crate::traits::adapter::Adapter;
use crate::types::UserId;

/// Verifies bearer credentials against an external identity provider.
///
/// Verification failures are terminal for the request; no retry is
/// attempted.
#[async_trait]
pub trait IdentityVerifier: Adapter {
    /// Resolves a bearer token to the verified caller identity.
    async fn verify(&self, token: &str) -> Result<UserId, QissaError>;
}
