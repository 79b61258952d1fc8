// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end video pipeline: submit, poll, persist, link.
//!
//! Side-effect ordering is the whole point of this module: the artifact is
//! written to the store first, the audit row second, and the model turn
//! referencing the artifact last. A turn never points at a path that does
//! not exist yet, and a failed or timed-out job persists nothing.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use qissa_artifacts::ArtifactStore;
use qissa_core::types::{ChatId, Role, Turn, UserId, VideoArtifactRecord};
use qissa_core::{ChatLedger, QissaError, VideoBackend};

use crate::poll;
use crate::singleflight::ActiveJobs;

/// One configured video pipeline (backend flavor + stores).
pub struct VideoPipeline {
    backend: Arc<dyn VideoBackend>,
    artifacts: ArtifactStore,
    ledger: Arc<dyn ChatLedger>,
    active: ActiveJobs,
    max_wait: Duration,
    public_base_url: String,
}

impl VideoPipeline {
    pub fn new(
        backend: Arc<dyn VideoBackend>,
        artifacts: ArtifactStore,
        ledger: Arc<dyn ChatLedger>,
        active: ActiveJobs,
        max_wait: Duration,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            artifacts,
            ledger,
            active,
            max_wait,
            public_base_url: public_base_url.into(),
        }
    }

    /// Pipeline label, used for artifact paths.
    pub fn label(&self) -> &str {
        self.backend.label()
    }

    /// Drive one job to completion for the given conversation and append
    /// the resulting model turn. Returns the turn text.
    ///
    /// `prompt` is the original user input (kept for the audit record);
    /// `story` is the text handed to the backend, which may be a generated
    /// expansion of the prompt.
    pub async fn generate(
        &self,
        chat: &ChatId,
        owner: &UserId,
        prompt: &str,
        story: &str,
    ) -> Result<String, QissaError> {
        let _guard = self.active.acquire(chat)?;

        let job = self.backend.submit(story).await?;
        info!(job_id = %job.id, label = self.backend.label(), %chat, "video job submitted");

        let (bytes, _content_type) =
            poll::run_to_completion(self.backend.as_ref(), &job, self.max_wait).await?;

        let path = self
            .artifacts
            .write(self.backend.label(), chat, &bytes)
            .await?;
        let path_str = path.to_string_lossy().into_owned();

        self.ledger
            .record_artifact(&VideoArtifactRecord {
                chat_id: chat.clone(),
                owner_id: owner.clone(),
                prompt: prompt.to_string(),
                path: path_str.clone(),
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await?;

        let turn_text = video_embed_html(&self.public_base_url, &path_str);
        self.ledger
            .append_turns(chat, owner, &[Turn::text(Role::Model, turn_text.clone())])
            .await?;

        Ok(turn_text)
    }
}

/// Render the artifact reference the clients embed directly.
pub fn video_embed_html(public_base_url: &str, path: &str) -> String {
    format!(
        "<div style='display:flex; justify-content:center; margin: 20px 0;'>\
         <video width='720' height='405' controls style='border-radius:12px;'>\
         <source src='{public_base_url}/{path}' type='video/mp4'>\
         Your browser does not support the video tag.\
         </video></div>"
    )
}
