// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation ledger trait.

use async_trait::async_trait;

use crate::error::QissaError;
use crate::traits::adapter::Adapter;
use crate::types::{
    ChatId, ChatKind, ChatSummary, Conversation, Turn, UserId, VideoArtifactRecord,
};

/// Append-only conversation store plus the per-user index of summaries.
///
/// All mutation is by appending; past turns are never rewritten. Concurrent
/// appends to one conversation are serialized by the backing store, not by
/// callers doing read-modify-write.
#[async_trait]
pub trait ChatLedger: Adapter {
    /// Opens the store (runs migrations). Must be called before any other operation.
    async fn initialize(&self) -> Result<(), QissaError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), QissaError>;

    /// Creates a conversation seeded with one user turn and appends the
    /// owner's index entry. Both commit in a single transaction.
    async fn create_chat(
        &self,
        owner: &UserId,
        kind: ChatKind,
        seed_text: &str,
    ) -> Result<ChatId, QissaError>;

    /// Returns the full conversation, or `NotFound` if it does not exist or
    /// is not owned by `owner`.
    async fn get_chat(&self, chat: &ChatId, owner: &UserId) -> Result<Conversation, QissaError>;

    /// Appends turns in order as one atomic update. `NotFound` under the
    /// same ownership check as [`ChatLedger::get_chat`]; the store is left
    /// unchanged on failure.
    async fn append_turns(
        &self,
        chat: &ChatId,
        owner: &UserId,
        turns: &[Turn],
    ) -> Result<(), QissaError>;

    /// Returns the owner's index entries, optionally filtered by kind
    /// (exact match), in insertion order.
    async fn list_chats(
        &self,
        owner: &UserId,
        kind: Option<ChatKind>,
    ) -> Result<Vec<ChatSummary>, QissaError>;

    /// Records one materialized video artifact for auditing.
    async fn record_artifact(&self, record: &VideoArtifactRecord) -> Result<(), QissaError>;
}
