// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval-augmented story generator.
//!
//! A small table of exemplar stories with precomputed prompt embeddings is
//! loaded once at startup. Each request embeds the query, picks the single
//! nearest exemplar by cosine similarity, and hands it to the model as a
//! style reference.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use qissa_core::types::{AdapterKind, HealthStatus, Turn};
use qissa_core::{Adapter, QissaError, TextGenerator};

use crate::gemini::GeminiClient;

const TEMPERATURE: f32 = 0.9;

#[derive(Debug, Deserialize)]
struct ExemplarRow {
    #[serde(rename = "Story")]
    story: String,
    prompt_embeddings: String,
}

/// One exemplar story with its prompt embedding.
#[derive(Debug, Clone)]
pub struct Exemplar {
    pub story: String,
    pub embedding: Vec<f32>,
}

/// In-memory nearest-neighbor table over the exemplar stories.
#[derive(Debug, Clone, Default)]
pub struct ExemplarTable {
    entries: Vec<Exemplar>,
}

impl ExemplarTable {
    /// Load the table from a CSV with `Story` and `prompt_embeddings`
    /// columns, the embedding stored as a JSON float array.
    pub fn load_csv(path: &Path) -> Result<Self, QissaError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| QissaError::Provider {
            message: format!("failed to open exemplar table {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;

        let mut entries = Vec::new();
        for row in reader.deserialize::<ExemplarRow>() {
            let row = row.map_err(|e| QissaError::Provider {
                message: format!("malformed exemplar row: {e}"),
                source: Some(Box::new(e)),
            })?;
            let embedding: Vec<f32> =
                serde_json::from_str(&row.prompt_embeddings).map_err(|e| {
                    QissaError::Provider {
                        message: format!("malformed exemplar embedding: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;
            entries.push(Exemplar {
                story: row.story,
                embedding,
            });
        }
        debug!(count = entries.len(), "exemplar table loaded");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The exemplar whose prompt embedding is nearest to `query` by cosine
    /// similarity. `None` on an empty table.
    pub fn nearest(&self, query: &[f32]) -> Option<&str> {
        self.entries
            .iter()
            .max_by(|a, b| {
                cosine_similarity(query, &a.embedding)
                    .total_cmp(&cosine_similarity(query, &b.embedding))
            })
            .map(|e| e.story.as_str())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return f32::NEG_INFINITY;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return f32::NEG_INFINITY;
    }
    dot / (norm_a * norm_b)
}

/// Story generator styled after the nearest exemplar.
pub struct RagStoryGenerator {
    llm: Arc<GeminiClient>,
    table: ExemplarTable,
}

impl RagStoryGenerator {
    pub fn new(llm: Arc<GeminiClient>, table: ExemplarTable) -> Self {
        Self { llm, table }
    }

    fn build_prompt(query: &str, context: &str) -> String {
        format!(
            "Write a complete, engaging story for the user's request. Use \
             the example story below only as a reference for tone, pacing, \
             and narrative flow; do not copy its plot. If no example is \
             given, still write the story. Start with a fitting title, then \
             the story itself, with no introductory remarks.\n\n\
             User request:\n{query}\n\n\
             Example story (style reference):\n{context}"
        )
    }
}

#[async_trait]
impl Adapter for RagStoryGenerator {
    fn name(&self) -> &str {
        "rag-story"
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, QissaError> {
        if self.table.is_empty() {
            Ok(HealthStatus::Degraded("exemplar table is empty".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl TextGenerator for RagStoryGenerator {
    async fn generate(&self, question: &str, _history: &[Turn]) -> Result<String, QissaError> {
        let context = if self.table.is_empty() {
            String::new()
        } else {
            let query_embedding = self.llm.embed(question).await?;
            self.table
                .nearest(&query_embedding)
                .unwrap_or_default()
                .to_string()
        };

        let prompt = Self::build_prompt(question, &context);
        self.llm.generate_content(&prompt, TEMPERATURE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cosine_prefers_aligned_vectors() {
        let a = [1.0, 0.0];
        assert!(cosine_similarity(&a, &[1.0, 0.0]) > cosine_similarity(&a, &[0.0, 1.0]));
        assert!(cosine_similarity(&a, &[2.0, 0.0]) > 0.999);
    }

    #[test]
    fn cosine_rejects_mismatched_or_zero_vectors() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), f32::NEG_INFINITY);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), f32::NEG_INFINITY);
    }

    #[test]
    fn nearest_picks_most_similar_exemplar() {
        let table = ExemplarTable {
            entries: vec![
                Exemplar {
                    story: "river tale".into(),
                    embedding: vec![1.0, 0.0],
                },
                Exemplar {
                    story: "mountain tale".into(),
                    embedding: vec![0.0, 1.0],
                },
            ],
        };
        assert_eq!(table.nearest(&[0.9, 0.1]), Some("river tale"));
        assert_eq!(table.nearest(&[0.1, 0.9]), Some("mountain tale"));
    }

    #[test]
    fn nearest_on_empty_table_is_none() {
        let table = ExemplarTable::default();
        assert_eq!(table.nearest(&[1.0]), None);
    }

    #[test]
    fn load_csv_parses_json_embeddings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Story,prompt_embeddings").unwrap();
        writeln!(file, "\"a river story\",\"[0.5, 0.5]\"").unwrap();
        writeln!(file, "\"a desert story\",\"[0.9, 0.1]\"").unwrap();
        file.flush().unwrap();

        let table = ExemplarTable::load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.nearest(&[0.9, 0.1]), Some("a desert story"));
    }

    #[test]
    fn load_csv_rejects_malformed_embedding() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Story,prompt_embeddings").unwrap();
        writeln!(file, "\"broken\",\"not a json array\"").unwrap();
        file.flush().unwrap();

        assert!(ExemplarTable::load_csv(file.path()).is_err());
    }
}
