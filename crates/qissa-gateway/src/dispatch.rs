// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-kind generation dispatch.
//!
//! Each conversation kind maps to one backend behavior, selected here and
//! nowhere else. Text kinds return the model text for the caller to append;
//! video kinds run their pipeline, which appends the model turn itself
//! after the artifact write.

use std::sync::Arc;

use tracing::info;

use qissa_core::types::{ChatId, ChatKind, Turn, UserId};
use qissa_core::{QissaError, TextGenerator};
use qissa_video::VideoPipeline;

/// Routes one generation request to the backend declared by the
/// conversation's kind.
pub struct GenerationRouter {
    history: Arc<dyn TextGenerator>,
    rag: Arc<dyn TextGenerator>,
    story: Arc<dyn TextGenerator>,
    video_static: VideoPipeline,
    video_fluid: VideoPipeline,
}

impl GenerationRouter {
    pub fn new(
        history: Arc<dyn TextGenerator>,
        rag: Arc<dyn TextGenerator>,
        story: Arc<dyn TextGenerator>,
        video_static: VideoPipeline,
        video_fluid: VideoPipeline,
    ) -> Self {
        Self {
            history,
            rag,
            story,
            video_static,
            video_fluid,
        }
    }

    /// Produce the model response for `question` under the given kind.
    ///
    /// For video kinds the returned text is the turn the pipeline already
    /// appended; callers must not append it again (see
    /// [`ChatKind::is_video`]).
    pub async fn respond(
        &self,
        kind: ChatKind,
        chat: &ChatId,
        owner: &UserId,
        question: &str,
        history: &[Turn],
    ) -> Result<String, QissaError> {
        match kind {
            ChatKind::HistoryChat => self.history.generate(question, history).await,
            ChatKind::RagStory => self.rag.generate(question, history).await,
            ChatKind::Story => self.story.generate(question, history).await,
            ChatKind::VideoStatic => {
                // The static backend renders a full story, not the raw
                // prompt: expand through the RAG story generator first.
                let story = self.rag.generate(question, &[]).await?;
                info!(%chat, "story generated for static video job");
                self.video_static.generate(chat, owner, question, &story).await
            }
            ChatKind::VideoFluid => {
                self.video_fluid.generate(chat, owner, question, question).await
            }
        }
    }
}
