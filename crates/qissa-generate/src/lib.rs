// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text generation adapters for the Qissa service.
//!
//! Three [`TextGenerator`] implementations sit behind the dispatcher: the
//! web-search-augmented history Q&A generator, the retrieval-augmented
//! story generator, and the client for the external multi-step story
//! service. The Gemini and search clients they share are constructed once
//! at startup and injected.
//!
//! [`TextGenerator`]: qissa_core::TextGenerator

pub mod gemini;
pub mod history;
pub mod rag;
pub mod search;
pub mod story;

pub use gemini::GeminiClient;
pub use history::HistoryGenerator;
pub use rag::{ExemplarTable, RagStoryGenerator};
pub use search::SearchClient;
pub use story::StoryClient;
