// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `qissa-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use qissa_core::types::{
    ChatId, ChatKind, ChatSummary, Conversation, Role, Turn, TurnPart, UserId,
    VideoArtifactRecord,
};
