// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History Q&A generator with web-search augmentation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use qissa_core::types::{AdapterKind, HealthStatus, Role, Turn};
use qissa_core::{Adapter, QissaError, TextGenerator};

use crate::gemini::GeminiClient;
use crate::search::SearchClient;

const TEMPERATURE: f32 = 0.7;

/// Answers history questions, grounding the model in fresh search snippets
/// and the prior conversation.
pub struct HistoryGenerator {
    llm: Arc<GeminiClient>,
    search: SearchClient,
}

impl HistoryGenerator {
    pub fn new(llm: Arc<GeminiClient>, search: SearchClient) -> Self {
        Self { llm, search }
    }

    fn build_prompt(question: &str, websearch: &str, history: &str) -> String {
        format!(
            "You are an expert historian and scholarly writer. Answer the \
             user's question about history in detail, citing what the web \
             search results support. If the question is not about history, \
             politely ask for a history question instead.\n\n\
             Web search results:\n{websearch}\n\n\
             Conversation history:\n{history}\n\n\
             If the conversation history is non-empty, the question may refer \
             back to people or things discussed earlier; answer with that \
             context in mind.\n\n\
             Question: {question}\n\nAnswer:"
        )
    }
}

/// Render prior turns as attributed lines for prompt inclusion.
fn render_history(history: &[Turn]) -> String {
    history
        .iter()
        .map(|turn| {
            let who = match turn.role {
                Role::User => "user",
                Role::Model => "model",
            };
            format!("{who}: {}", turn.joined_text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Adapter for HistoryGenerator {
    fn name(&self) -> &str {
        "history-chat"
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, QissaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TextGenerator for HistoryGenerator {
    async fn generate(&self, question: &str, history: &[Turn]) -> Result<String, QissaError> {
        // A broken search degrades the answer, it does not fail the request.
        let websearch = match self.search.search(question).await {
            Ok(snippets) => snippets,
            Err(e) => {
                warn!(error = %e, "web search unavailable, answering without it");
                format!("(web search unavailable: {e})")
            }
        };

        let prompt = Self::build_prompt(question, &websearch, &render_history(history));
        self.llm.generate_content(&prompt, TEMPERATURE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_renders_as_attributed_lines() {
        let history = [
            Turn::text(Role::User, "who was akbar?"),
            Turn::text(Role::Model, "The third Mughal emperor."),
        ];
        let rendered = render_history(&history);
        assert_eq!(rendered, "user: who was akbar?\nmodel: The third Mughal emperor.");
    }

    #[test]
    fn prompt_carries_all_three_sections() {
        let prompt = HistoryGenerator::build_prompt("who succeeded him?", "snippet", "user: hi");
        assert!(prompt.contains("Web search results:\nsnippet"));
        assert!(prompt.contains("Conversation history:\nuser: hi"));
        assert!(prompt.contains("Question: who succeeded him?"));
    }
}
