// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Qissa service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Qissa configuration.
///
/// Loaded from TOML files with environment variable overrides. All sections
/// are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QissaConfig {
    /// HTTP service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Identity provider settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Artifact store settings.
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    /// LLM API settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Web search settings for the history generator.
    #[serde(default)]
    pub search: SearchConfig,

    /// Exemplar table settings for the RAG story generator.
    #[serde(default)]
    pub rag: RagConfig,

    /// Multi-step story service settings.
    #[serde(default)]
    pub story: StoryConfig,

    /// Two-step video backend settings.
    #[serde(default)]
    pub video_static: VideoBackendConfig,

    /// Single-step video backend settings.
    #[serde(default)]
    pub video_fluid: VideoBackendConfig,

    /// PDF export settings.
    #[serde(default)]
    pub pdf: PdfConfig,
}

/// HTTP service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Allowed CORS origin (the browser client).
    #[serde(default = "default_client_origin")]
    pub client_origin: String,

    /// Public base URL embedded in artifact references.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            client_origin: default_client_origin(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_client_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// Identity provider configuration.
///
/// Token verification is delegated to the provider's verify endpoint.
/// When `secret_key` is unset the gateway rejects every request (fail-closed).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Base URL of the identity provider API.
    #[serde(default = "default_auth_base_url")]
    pub base_url: String,

    /// Provider secret key. `None` disables all authenticated routes.
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Origin the tokens must be issued for.
    #[serde(default = "default_client_origin")]
    pub authorized_party: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: default_auth_base_url(),
            secret_key: None,
            authorized_party: default_client_origin(),
        }
    }
}

fn default_auth_base_url() -> String {
    "https://api.clerk.com".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "qissa.db".to_string()
}

/// Artifact store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    /// Directory artifacts are written under and served from.
    #[serde(default = "default_videos_dir")]
    pub videos_dir: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            videos_dir: default_videos_dir(),
        }
    }
}

fn default_videos_dir() -> String {
    "videos".to_string()
}

/// LLM API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the generative language API.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model used for chat/story completion.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for query embeddings.
    #[serde(default = "default_embed_model")]
    pub embed_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            chat_model: default_chat_model(),
            embed_model: default_embed_model(),
        }
    }
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_chat_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_embed_model() -> String {
    "text-embedding-004".to_string()
}

/// Web search configuration for the history generator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Base URL of the HTML search endpoint.
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Number of result pages to fetch and summarize.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Per-page fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            top_k: default_top_k(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_search_base_url() -> String {
    "https://html.duckduckgo.com".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Exemplar table configuration for the RAG story generator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RagConfig {
    /// Path to the CSV of precomputed exemplar embeddings.
    #[serde(default = "default_exemplar_csv")]
    pub exemplar_csv: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            exemplar_csv: default_exemplar_csv(),
        }
    }
}

fn default_exemplar_csv() -> String {
    "data/embedded_prompts.csv".to_string()
}

/// Multi-step story service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoryConfig {
    /// Base URL of the story generation service.
    #[serde(default)]
    pub base_url: String,

    /// Maximum generation steps requested per story.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_steps: default_max_steps(),
        }
    }
}

fn default_max_steps() -> u32 {
    9
}

/// One video backend's connection and polling configuration.
///
/// Defaults describe the fluid (single-step) flavor; the static flavor's
/// section overrides `poll_interval_secs` to 10 in the shipped config.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VideoBackendConfig {
    /// Base URL of the video generation service.
    #[serde(default)]
    pub base_url: String,

    /// Fixed delay between status probes, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Wall-clock budget for one job, in seconds. Exceeding it is a
    /// distinct timeout failure, not a backend error.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// Frame count requested per job (single-step flavor only).
    #[serde(default = "default_num_frames")]
    pub num_frames: u32,
}

impl Default for VideoBackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            poll_interval_secs: default_poll_interval_secs(),
            max_wait_secs: default_max_wait_secs(),
            num_frames: default_num_frames(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_wait_secs() -> u64 {
    600
}

fn default_num_frames() -> u32 {
    16
}

/// PDF export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PdfConfig {
    /// Footer watermark text.
    #[serde(default = "default_watermark")]
    pub watermark: String,

    /// Path to a TTF embedded for rendering. `None` uses the builtin font.
    #[serde(default)]
    pub font_path: Option<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            watermark: default_watermark(),
            font_path: None,
        }
    }
}

fn default_watermark() -> String {
    "Generated By Qissa".to_string()
}
