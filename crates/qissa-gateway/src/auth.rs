// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Every API request carries `Authorization: Bearer <token>`. The token is
//! resolved to a user id by the configured [`IdentityVerifier`]; requests
//! without a valid token are rejected. When no provider secret is
//! configured, all requests are rejected (fail-closed).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

use qissa_config::model::AuthConfig;
use qissa_core::types::{AdapterKind, HealthStatus, UserId};
use qissa_core::{Adapter, IdentityVerifier, QissaError};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Middleware that resolves the bearer token to a [`UserId`] extension.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            QissaError::Unauthorized("missing or invalid Authorization header".into())
        })?;

    let user = state.verifier.verify(token).await?;
    debug!(user = %user.0, "request authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user_id: String,
}

/// Identity verifier backed by the provider's token verification endpoint.
///
/// The provider checks the token's signature, expiry, and authorized party;
/// this client only relays the verdict. Any failure, including transport,
/// is an authentication failure for the request.
pub struct ClerkVerifier {
    client: reqwest::Client,
    base_url: String,
    secret_key: Option<String>,
    authorized_party: String,
}

impl ClerkVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, QissaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| QissaError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            authorized_party: config.authorized_party.clone(),
        })
    }
}

#[async_trait]
impl Adapter for ClerkVerifier {
    fn name(&self) -> &str {
        "clerk"
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, QissaError> {
        if self.secret_key.is_none() {
            Ok(HealthStatus::Unhealthy("no secret key configured".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl IdentityVerifier for ClerkVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, QissaError> {
        // No secret means no way to verify anything: reject everything.
        let Some(secret) = &self.secret_key else {
            tracing::error!("gateway has no identity provider secret -- rejecting request");
            return Err(QissaError::Unauthorized(
                "identity provider not configured".into(),
            ));
        };

        let url = format!("{}/v1/tokens/verify", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(secret)
            .json(&serde_json::json!({
                "token": token,
                "authorized_party": self.authorized_party,
            }))
            .send()
            .await
            .map_err(|e| QissaError::Unauthorized(format!("token verification failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QissaError::Unauthorized(format!(
                "token rejected by identity provider ({status})"
            )));
        }

        let verdict: VerifyResponse = response
            .json()
            .await
            .map_err(|e| QissaError::Unauthorized(format!("token verification failed: {e}")))?;
        Ok(UserId(verdict.user_id))
    }
}
