// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini generative language API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication, content generation, query embedding, and transient
//! error retry.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use qissa_config::model::LlmConfig;
use qissa_core::QissaError;

/// Shared client for the chat and embedding models.
///
/// Manages the API key header, connection pooling, and retry logic for
/// transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    chat_model: String,
    embed_model: String,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl GeminiClient {
    /// Creates a new Gemini API client from the LLM configuration.
    ///
    /// Fails with a configuration error when no API key is set.
    pub fn new(config: &LlmConfig) -> Result<Self, QissaError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| QissaError::Config("llm.api_key is required".into()))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            reqwest::header::HeaderValue::from_str(&api_key)
                .map_err(|e| QissaError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            "content-type",
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| QissaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embed_model: config.embed_model.clone(),
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sends one completion request and returns the concatenated candidate text.
    pub async fn generate_content(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, QissaError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.chat_model
        );
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": temperature },
        });

        let text = self.post_with_retry(&url, &body, "completion").await?;
        let response: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| QissaError::Provider {
                message: format!("failed to parse completion response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let answer: String = response
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();
        if answer.is_empty() {
            return Err(QissaError::Provider {
                message: "completion response contained no candidates".into(),
                source: None,
            });
        }
        Ok(answer)
    }

    /// Embeds one query string.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, QissaError> {
        let url = format!(
            "{}/v1beta/models/{}:embedContent",
            self.base_url, self.embed_model
        );
        let body = serde_json::json!({
            "content": { "parts": [{ "text": text }] },
        });

        let raw = self.post_with_retry(&url, &body, "embedding").await?;
        let response: EmbedResponse =
            serde_json::from_str(&raw).map_err(|e| QissaError::Provider {
                message: format!("failed to parse embedding response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(response.embedding.values)
    }

    /// POST with one retry on transient statuses, returning the success body.
    async fn post_with_retry(
        &self,
        url: &str,
        body: &serde_json::Value,
        what: &str,
    ) -> Result<String, QissaError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, what, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(url)
                .json(body)
                .send()
                .await
                .map_err(|e| QissaError::Provider {
                    message: format!("{what} request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, what, "response received");

            if status.is_success() {
                return response.text().await.map_err(|e| QissaError::Provider {
                    message: format!("failed to read {what} response body: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body_text = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body_text, "transient error, will retry");
                last_error = Some(QissaError::Provider {
                    message: format!("API returned {status}: {body_text}"),
                    source: None,
                });
                continue;
            }

            return Err(QissaError::Provider {
                message: format!("API returned {status}: {body_text}"),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| QissaError::Provider {
            message: "request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
