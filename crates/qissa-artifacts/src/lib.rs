// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem artifact store.
//!
//! Completed video jobs are persisted under a deterministic path keyed by
//! `(pipeline label, conversation id)`. The path is stable across retries:
//! a later job for the same key overwrites the former in place. Serving the
//! bytes back is delegated to the gateway's static file route over the same
//! root directory.

use std::path::{Path, PathBuf};

use qissa_core::{ChatId, QissaError};
use tracing::debug;

/// Fixed artifact filename under the derived directory.
const ARTIFACT_FILENAME: &str = "output.mp4";

/// Deterministic-path store for binary artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root`. The directory itself is created on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory artifacts are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path a `(label, chat)` artifact lives at, whether or not it has
    /// been written yet.
    pub fn path_for(&self, label: &str, chat: &ChatId) -> PathBuf {
        self.root.join(label).join(&chat.0).join(ARTIFACT_FILENAME)
    }

    /// Persist an artifact, creating intermediate directories as needed.
    ///
    /// Idempotent under retry: a second write with the same key replaces
    /// the previous bytes at the same path.
    pub async fn write(
        &self,
        label: &str,
        chat: &ChatId,
        bytes: &[u8],
    ) -> Result<PathBuf, QissaError> {
        let path = self.path_for(label, chat);
        let dir = path.parent().ok_or_else(|| QissaError::Internal(format!(
            "artifact path {} has no parent",
            path.display()
        )))?;
        tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
        tokio::fs::write(&path, bytes).await.map_err(io_err)?;
        debug!(path = %path.display(), size = bytes.len(), "artifact written");
        Ok(path)
    }
}

fn io_err(e: std::io::Error) -> QissaError {
    QissaError::Storage {
        source: Box::new(e),
    }
}
