// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Video job backend trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::QissaError;
use crate::traits::adapter::Adapter;
use crate::types::{Job, JobOutcome};

/// An asynchronous video generation backend.
///
/// The two service flavors signal completion differently (one reports a
/// `done` status and requires a separate fetch, the other returns the bytes
/// straight from the polling endpoint). Both are normalized here into
/// [`JobOutcome`] so the poll loop stays flavor-agnostic. The flavor is
/// selected once at configuration time, never re-derived per response.
#[async_trait]
pub trait VideoBackend: Adapter {
    /// Submits a new job for the given story text.
    async fn submit(&self, story: &str) -> Result<Job, QissaError>;

    /// Issues one status/result probe for a submitted job.
    async fn poll(&self, job: &Job) -> Result<JobOutcome, QissaError>;

    /// Fixed delay between probes. A domain constant per backend, not adaptive.
    fn poll_interval(&self) -> Duration;

    /// Pipeline label used for artifact paths and the user index.
    fn label(&self) -> &str;
}
