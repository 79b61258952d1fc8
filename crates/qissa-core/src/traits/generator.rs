// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text generation trait for the opaque completion backends.

use async_trait::async_trait;

use crate::error::QissaError;
use crate::traits::adapter::Adapter;
use crate::types::Turn;

/// A single-shot text generation backend.
///
/// Implementations wrap an LLM call, an external generation service, or a
/// composition of both. The conversation history is passed so stateful
/// generators can thread prior turns into their prompt; stateless ones
/// ignore it.
#[async_trait]
pub trait TextGenerator: Adapter {
    /// Produces one model response for the given question.
    async fn generate(&self, question: &str, history: &[Turn]) -> Result<String, QissaError>;
}
