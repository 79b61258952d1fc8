// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Qissa generation service.

use thiserror::Error;

/// The primary error type used across all Qissa adapter traits and core operations.
#[derive(Debug, Error)]
pub enum QissaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Caller is not authenticated or the token failed verification.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Conversation does not exist or is not owned by the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// Generation collaborator errors (LLM, web search, embedding, PDF renderer).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Job creation request was rejected or returned a malformed body.
    #[error("job submission failed: {message}")]
    Submission {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A running job reported a hard failure. Terminal; never retried.
    #[error("job failed: {reason}")]
    JobFailed { reason: String },

    /// Polling exceeded its wall-clock budget before the job finished.
    #[error("job timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A generation job is already in flight for this conversation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// PDF export was requested on a conversation with no model turn.
    #[error("no content: {0}")]
    NoContent(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_distinct_from_job_failure() {
        let timeout = QissaError::Timeout {
            duration: std::time::Duration::from_secs(600),
        };
        let failed = QissaError::JobFailed {
            reason: "render crashed".into(),
        };
        assert!(timeout.to_string().contains("timed out"));
        assert!(failed.to_string().contains("render crashed"));
    }

    #[test]
    fn error_messages_embed_upstream_reason() {
        let err = QissaError::Submission {
            message: "backend returned 502".into(),
            source: None,
        };
        assert!(err.to_string().contains("502"));
    }
}
