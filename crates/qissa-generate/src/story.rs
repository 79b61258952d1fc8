// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external multi-step story generation service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use qissa_config::model::StoryConfig;
use qissa_core::types::{AdapterKind, HealthStatus, Turn};
use qissa_core::{Adapter, QissaError, TextGenerator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct StoryResponse {
    #[serde(default)]
    story: Option<String>,
}

/// Multi-step story generation, delegated entirely to the external service.
pub struct StoryClient {
    client: reqwest::Client,
    base_url: String,
    max_steps: u32,
}

impl StoryClient {
    pub fn new(config: &StoryConfig) -> Result<Self, QissaError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| QissaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_steps: config.max_steps,
        })
    }
}

#[async_trait]
impl Adapter for StoryClient {
    fn name(&self) -> &str {
        "story-gen"
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, QissaError> {
        if self.base_url.is_empty() {
            Ok(HealthStatus::Unhealthy("no base URL configured".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl TextGenerator for StoryClient {
    async fn generate(&self, question: &str, _history: &[Turn]) -> Result<String, QissaError> {
        let url = format!("{}/generate_story/", self.base_url);
        let body = serde_json::json!({
            "concept": question,
            "initial_story": "",
            "max_steps": self.max_steps,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| QissaError::Provider {
                message: format!("story request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| QissaError::Provider {
            message: format!("failed to read story response: {e}"),
            source: Some(Box::new(e)),
        })?;
        if !status.is_success() {
            return Err(QissaError::Provider {
                message: format!("story service returned {status}: {text}"),
                source: None,
            });
        }

        let parsed: StoryResponse =
            serde_json::from_str(&text).map_err(|e| QissaError::Provider {
                message: format!("failed to parse story response: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(steps = self.max_steps, "story generated");
        Ok(parsed
            .story
            .unwrap_or_else(|| "No story returned.".to_string()))
    }
}
