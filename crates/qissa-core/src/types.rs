// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the Qissa service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Verified identity of a caller, as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attribution of a turn within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One content fragment of a turn. Currently always text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One immutable entry in a conversation's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<TurnPart>,
}

impl Turn {
    /// Build a single-part turn.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    /// Concatenated text of all parts.
    pub fn joined_text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// The declared generation backend selector for a conversation.
///
/// Serialized exactly as the wire strings the clients send in `type`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ChatKind {
    #[strum(serialize = "History ChatBot")]
    #[serde(rename = "History ChatBot")]
    HistoryChat,

    #[strum(serialize = "RAG Story Generation")]
    #[serde(rename = "RAG Story Generation")]
    RagStory,

    #[strum(serialize = "Story Generation")]
    #[serde(rename = "Story Generation")]
    Story,

    #[strum(serialize = "Video Generation (Static)")]
    #[serde(rename = "Video Generation (Static)")]
    VideoStatic,

    #[strum(serialize = "Video Generation (Fluid)")]
    #[serde(rename = "Video Generation (Fluid)")]
    VideoFluid,
}

impl ChatKind {
    /// Whether this kind routes through a video pipeline rather than a text generator.
    pub fn is_video(self) -> bool {
        matches!(self, ChatKind::VideoStatic | ChatKind::VideoFluid)
    }
}

/// A persisted, owned sequence of turns with a declared generation kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ChatId,
    pub owner_id: UserId,
    pub kind: ChatKind,
    pub history: Vec<Turn>,
    pub created_at: String,
}

impl Conversation {
    /// Concatenated text of the most recent model turn, if any.
    pub fn latest_model_text(&self) -> Option<String> {
        self.history
            .iter()
            .rev()
            .find(|t| t.role == Role::Model)
            .map(Turn::joined_text)
    }
}

/// Per-user index entry summarizing one conversation for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: ChatId,
    pub title: String,
    pub kind: ChatKind,
    pub created_at: String,
}

/// Opaque handle to an asynchronous generation job on an external backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
}

/// The tagged result of one status check against a job.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// Job accepted, artifact not ready yet.
    Pending,
    /// Artifact materialized.
    Done {
        bytes: Vec<u8>,
        content_type: String,
    },
    /// Backend reported a hard failure for this job.
    Failed { reason: String },
}

/// One materialized video artifact, denormalized for auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoArtifactRecord {
    pub chat_id: ChatId,
    pub owner_id: UserId,
    pub prompt: String,
    pub path: String,
    pub created_at: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterKind {
    Auth,
    Generator,
    VideoBackend,
    Ledger,
}
