// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation single-flight guard.
//!
//! At most one video job may be in flight for a conversation at a time.
//! The reference behavior relied on callers not racing; here the invariant
//! is structural: a second acquisition for the same key fails with
//! `Conflict` until the guard for the first is dropped.

use std::sync::Arc;

use dashmap::DashMap;

use qissa_core::{ChatId, QissaError};

/// Registry of conversations with an in-flight generation job.
#[derive(Clone, Default)]
pub struct ActiveJobs {
    inner: Arc<DashMap<String, ()>>,
}

impl ActiveJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the conversation for one job. Fails with `Conflict` while
    /// another claim is outstanding.
    pub fn acquire(&self, chat: &ChatId) -> Result<JobGuard, QissaError> {
        use dashmap::mapref::entry::Entry;
        match self.inner.entry(chat.0.clone()) {
            Entry::Occupied(_) => Err(QissaError::Conflict(format!(
                "a generation job is already running for chat {chat}"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(JobGuard {
                    key: chat.0.clone(),
                    registry: Arc::clone(&self.inner),
                })
            }
        }
    }
}

/// Releases the claim when dropped, including on error paths.
pub struct JobGuard {
    key: String,
    registry: Arc<DashMap<String, ()>>,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.key);
    }
}
