// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Qissa generation service.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the Qissa workspace. All adapters implement
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QissaError;
pub use types::{
    AdapterKind, ChatId, ChatKind, ChatSummary, Conversation, HealthStatus, Job, JobOutcome,
    Role, Turn, TurnPart, UserId, VideoArtifactRecord,
};

// Re-export all adapter traits at crate root.
pub use traits::{Adapter, ChatLedger, IdentityVerifier, TextGenerator, VideoBackend};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qissa_error_has_all_variants() {
        let _config = QissaError::Config("test".into());
        let _storage = QissaError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _unauthorized = QissaError::Unauthorized("test".into());
        let _not_found = QissaError::NotFound("test".into());
        let _provider = QissaError::Provider {
            message: "test".into(),
            source: None,
        };
        let _submission = QissaError::Submission {
            message: "test".into(),
            source: None,
        };
        let _job_failed = QissaError::JobFailed {
            reason: "test".into(),
        };
        let _timeout = QissaError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _conflict = QissaError::Conflict("test".into());
        let _no_content = QissaError::NoContent("test".into());
        let _internal = QissaError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any trait module is missing or fails to compile, this test
        // won't compile.
        fn _assert_adapter<T: Adapter>() {}
        fn _assert_verifier<T: IdentityVerifier>() {}
        fn _assert_generator<T: TextGenerator>() {}
        fn _assert_video_backend<T: VideoBackend>() {}
        fn _assert_ledger<T: ChatLedger>() {}
    }
}
