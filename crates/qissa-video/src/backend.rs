// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP clients for the two video generation services.
//!
//! Both backends expose the same submit/poll surface behind
//! [`VideoBackend`], normalizing their different completion signaling into
//! [`JobOutcome`]. The flavor is chosen once at configuration time; the
//! poll loop never inspects response shapes itself.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use qissa_config::model::VideoBackendConfig;
use qissa_core::types::{AdapterKind, ChatKind, HealthStatus, Job, JobOutcome};
use qissa_core::{Adapter, QissaError, VideoBackend};

/// Timeout for submit and status requests. Downloads of the finished
/// artifact reuse the same client, so it also bounds the fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn build_client() -> Result<reqwest::Client, QissaError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| QissaError::Internal(format!("failed to build HTTP client: {e}")))
}

fn transport_err(context: &str, e: reqwest::Error) -> QissaError {
    QissaError::Provider {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

async fn parse_submit(context: &str, response: reqwest::Response) -> Result<Job, QissaError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_err(context, e))?;
    if !status.is_success() {
        return Err(QissaError::Submission {
            message: format!("{context} returned {status}: {body}"),
            source: None,
        });
    }
    let parsed: SubmitResponse =
        serde_json::from_str(&body).map_err(|e| QissaError::Submission {
            message: format!("{context} returned a body without a job id: {e}"),
            source: Some(Box::new(e)),
        })?;
    Ok(Job { id: parsed.job_id })
}

/// Two-step backend: a status endpoint reports `done`, then the artifact is
/// fetched by id from a separate endpoint.
pub struct StaticVideoBackend {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    label: String,
}

impl StaticVideoBackend {
    pub fn new(config: &VideoBackendConfig) -> Result<Self, QissaError> {
        Ok(Self {
            client: build_client()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            label: ChatKind::VideoStatic.to_string(),
        })
    }

    async fn fetch_artifact(&self, job: &Job) -> Result<JobOutcome, QissaError> {
        let url = format!("{}/get_video/{}", self.base_url, job.id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_err("video fetch failed", e))?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !response.status().is_success() || !content_type.starts_with("video/mp4") {
            return Ok(JobOutcome::Failed {
                reason: format!("unexpected response fetching video: {content_type}"),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_err("video download failed", e))?;
        Ok(JobOutcome::Done {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[async_trait]
impl Adapter for StaticVideoBackend {
    fn name(&self) -> &str {
        "video-static"
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::VideoBackend
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
impl VideoBackend for StaticVideoBackend {
    async fn submit(&self, story: &str) -> Result<Job, QissaError> {
        let url = format!("{}/make_video", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "story": story }))
            .send()
            .await
            .map_err(|e| QissaError::Submission {
                message: format!("job creation request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        parse_submit("job creation", response).await
    }

    async fn poll(&self, job: &Job) -> Result<JobOutcome, QissaError> {
        let url = format!("{}/job_status/{}", self.base_url, job.id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_err("status request failed", e))?;
        let http_status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_err("status body read failed", e))?;
        if !http_status.is_success() {
            return Err(QissaError::Provider {
                message: format!("status endpoint returned {http_status}: {body}"),
                source: None,
            });
        }
        let parsed: StatusResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) => {
                return Ok(JobOutcome::Failed {
                    reason: "unexpected response from status endpoint".into(),
                })
            }
        };
        debug!(job_id = %job.id, status = %parsed.status, "status probe");
        match parsed.status.as_str() {
            "pending" | "processing" => Ok(JobOutcome::Pending),
            "error" => Ok(JobOutcome::Failed {
                reason: parsed.error.unwrap_or_else(|| "video job failed".into()),
            }),
            "done" => self.fetch_artifact(job).await,
            other => Ok(JobOutcome::Failed {
                reason: format!("unexpected status: {other}"),
            }),
        }
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Single-step backend: the result endpoint returns a JSON status envelope
/// while the job runs and the raw artifact bytes once it is ready.
pub struct FluidVideoBackend {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    num_frames: u32,
    label: String,
}

impl FluidVideoBackend {
    pub fn new(config: &VideoBackendConfig) -> Result<Self, QissaError> {
        Ok(Self {
            client: build_client()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            num_frames: config.num_frames,
            label: ChatKind::VideoFluid.to_string(),
        })
    }
}

#[async_trait]
impl Adapter for FluidVideoBackend {
    fn name(&self) -> &str {
        "video-fluid"
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::VideoBackend
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
impl VideoBackend for FluidVideoBackend {
    async fn submit(&self, story: &str) -> Result<Job, QissaError> {
        let url = format!("{}/enqueue_story", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "story": story, "num_frames": self.num_frames }))
            .send()
            .await
            .map_err(|e| QissaError::Submission {
                message: format!("job enqueue request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        parse_submit("job enqueue", response).await
    }

    async fn poll(&self, job: &Job) -> Result<JobOutcome, QissaError> {
        let url = format!("{}/result/{}", self.base_url, job.id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_err("result request failed", e))?;
        let http_status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("application/json") {
            let body = response
                .text()
                .await
                .map_err(|e| transport_err("result body read failed", e))?;
            if !http_status.is_success() {
                return Err(QissaError::Provider {
                    message: format!("result endpoint returned {http_status}: {body}"),
                    source: None,
                });
            }
            let parsed: StatusResponse = match serde_json::from_str(&body) {
                Ok(parsed) => parsed,
                Err(_) => {
                    return Ok(JobOutcome::Failed {
                        reason: "unexpected response from result endpoint".into(),
                    })
                }
            };
            debug!(job_id = %job.id, status = %parsed.status, "result probe");
            return match parsed.status.as_str() {
                "processing" | "pending" => Ok(JobOutcome::Pending),
                "error" => Ok(JobOutcome::Failed {
                    reason: parsed.error.unwrap_or_else(|| "video job failed".into()),
                }),
                other => Ok(JobOutcome::Failed {
                    reason: format!("unexpected status: {other}"),
                }),
            };
        }

        if http_status.is_success() && content_type.starts_with("video/mp4") {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| transport_err("video download failed", e))?;
            return Ok(JobOutcome::Done {
                bytes: bytes.to_vec(),
                content_type,
            });
        }

        Ok(JobOutcome::Failed {
            reason: format!("unexpected response type: {content_type}"),
        })
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> VideoBackendConfig {
        VideoBackendConfig {
            base_url: base_url.to_string(),
            poll_interval_secs: 1,
            max_wait_secs: 10,
            num_frames: 16,
        }
    }

    // --- Static flavor ---

    #[tokio::test]
    async fn static_submit_returns_job_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/make_video"))
            .and(body_json(serde_json::json!({ "story": "a calm river" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "job_id": "j-1" })),
            )
            .mount(&server)
            .await;

        let backend = StaticVideoBackend::new(&config(&server.uri())).unwrap();
        let job = backend.submit("a calm river").await.unwrap();
        assert_eq!(job.id, "j-1");
    }

    #[tokio::test]
    async fn static_submit_fails_on_missing_job_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/make_video"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })),
            )
            .mount(&server)
            .await;

        let backend = StaticVideoBackend::new(&config(&server.uri())).unwrap();
        let err = backend.submit("story").await.unwrap_err();
        assert!(matches!(err, QissaError::Submission { .. }));
    }

    #[tokio::test]
    async fn static_submit_fails_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/make_video"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let backend = StaticVideoBackend::new(&config(&server.uri())).unwrap();
        let err = backend.submit("story").await.unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn static_poll_classifies_pending_and_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job_status/j-pending"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "pending" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/job_status/j-error"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "status": "error", "error": "render crashed" }),
            ))
            .mount(&server)
            .await;

        let backend = StaticVideoBackend::new(&config(&server.uri())).unwrap();

        let outcome = backend.poll(&Job { id: "j-pending".into() }).await.unwrap();
        assert!(matches!(outcome, JobOutcome::Pending));

        let outcome = backend.poll(&Job { id: "j-error".into() }).await.unwrap();
        match outcome {
            JobOutcome::Failed { reason } => assert_eq!(reason, "render crashed"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn static_done_triggers_separate_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job_status/j-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "done" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/get_video/j-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "video/mp4")
                    .set_body_bytes(b"mp4 payload".to_vec()),
            )
            .mount(&server)
            .await;

        let backend = StaticVideoBackend::new(&config(&server.uri())).unwrap();
        let outcome = backend.poll(&Job { id: "j-1".into() }).await.unwrap();
        match outcome {
            JobOutcome::Done { bytes, content_type } => {
                assert_eq!(bytes, b"mp4 payload");
                assert!(content_type.starts_with("video/mp4"));
            }
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn static_unexpected_body_is_failed_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job_status/j-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string("not json"),
            )
            .mount(&server)
            .await;

        let backend = StaticVideoBackend::new(&config(&server.uri())).unwrap();
        let outcome = backend.poll(&Job { id: "j-1".into() }).await.unwrap();
        assert!(matches!(outcome, JobOutcome::Failed { .. }));
    }

    // --- Fluid flavor ---

    #[tokio::test]
    async fn fluid_submit_sends_frame_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/enqueue_story"))
            .and(body_json(
                serde_json::json!({ "story": "a calm river", "num_frames": 16 }),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "job_id": "f-1" })),
            )
            .mount(&server)
            .await;

        let backend = FluidVideoBackend::new(&config(&server.uri())).unwrap();
        let job = backend.submit("a calm river").await.unwrap();
        assert_eq!(job.id, "f-1");
    }

    #[tokio::test]
    async fn fluid_poll_classifies_by_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/result/f-processing"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "processing" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/result/f-done"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "video/mp4")
                    .set_body_bytes(b"frames".to_vec()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/result/f-error"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "status": "error", "error": "out of memory" }),
            ))
            .mount(&server)
            .await;

        let backend = FluidVideoBackend::new(&config(&server.uri())).unwrap();

        let outcome = backend
            .poll(&Job { id: "f-processing".into() })
            .await
            .unwrap();
        assert!(matches!(outcome, JobOutcome::Pending));

        let outcome = backend.poll(&Job { id: "f-done".into() }).await.unwrap();
        assert!(matches!(outcome, JobOutcome::Done { .. }));

        let outcome = backend.poll(&Job { id: "f-error".into() }).await.unwrap();
        match outcome {
            JobOutcome::Failed { reason } => assert_eq!(reason, "out of memory"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fluid_unexpected_content_type_is_failed_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/result/f-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html>oops</html>"),
            )
            .mount(&server)
            .await;

        let backend = FluidVideoBackend::new(&config(&server.uri())).unwrap();
        let outcome = backend.poll(&Job { id: "f-1".into() }).await.unwrap();
        match outcome {
            JobOutcome::Failed { reason } => assert!(reason.contains("text/html")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn backends_report_their_domain_constants() {
        let static_backend = StaticVideoBackend::new(&VideoBackendConfig {
            base_url: "http://example".into(),
            poll_interval_secs: 10,
            max_wait_secs: 600,
            num_frames: 16,
        })
        .unwrap();
        let fluid_backend = FluidVideoBackend::new(&VideoBackendConfig {
            base_url: "http://example".into(),
            poll_interval_secs: 5,
            max_wait_secs: 600,
            num_frames: 16,
        })
        .unwrap();

        assert_eq!(static_backend.poll_interval(), Duration::from_secs(10));
        assert_eq!(fluid_backend.poll_interval(), Duration::from_secs(5));
        assert_eq!(static_backend.label(), "Video Generation (Static)");
        assert_eq!(fluid_backend.label(), "Video Generation (Fluid)");
    }
}
