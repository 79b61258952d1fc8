// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Video generation pipelines for the Qissa service.
//!
//! Wraps the two external video services behind the [`VideoBackend`] trait,
//! drives submitted jobs to a terminal state with a bounded poll loop, and
//! materializes completed artifacts into the store before linking them from
//! the conversation ledger.
//!
//! [`VideoBackend`]: qissa_core::VideoBackend

pub mod backend;
pub mod pipeline;
pub mod poll;
pub mod singleflight;

pub use backend::{FluidVideoBackend, StaticVideoBackend};
pub use pipeline::{video_embed_html, VideoPipeline};
pub use poll::run_to_completion;
pub use singleflight::{ActiveJobs, JobGuard};
