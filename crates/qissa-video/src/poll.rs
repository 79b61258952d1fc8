// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The poll loop: drives one submitted job to a terminal state.
//!
//! State machine: `Polling -> {Completed, Failed, TimedOut}`. Only
//! `Pending` re-enters the loop, after the backend's fixed interval. The
//! first `Failed` outcome or transport error is terminal; a hard failure
//! from the backend is never retried. The wall-clock budget turns a
//! never-completing job into a distinct `Timeout` error instead of an
//! open-ended wait.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use qissa_core::types::{Job, JobOutcome};
use qissa_core::{QissaError, VideoBackend};

/// Poll `job` until the backend reports a terminal outcome or `max_wait`
/// elapses. Returns the artifact bytes and their content type.
///
/// The loop suspends the calling task between probes; it holds no locks and
/// performs no writes, so an error return leaves nothing to clean up.
pub async fn run_to_completion(
    backend: &dyn VideoBackend,
    job: &Job,
    max_wait: Duration,
) -> Result<(Vec<u8>, String), QissaError> {
    let interval = backend.poll_interval();
    let started = Instant::now();
    let mut probes = 0u32;

    loop {
        probes += 1;
        match backend.poll(job).await? {
            JobOutcome::Done { bytes, content_type } => {
                info!(
                    job_id = %job.id,
                    probes,
                    elapsed_secs = started.elapsed().as_secs(),
                    size = bytes.len(),
                    "video job completed"
                );
                return Ok((bytes, content_type));
            }
            JobOutcome::Failed { reason } => {
                warn!(job_id = %job.id, probes, %reason, "video job failed");
                return Err(QissaError::JobFailed { reason });
            }
            JobOutcome::Pending => {
                if started.elapsed() + interval > max_wait {
                    warn!(job_id = %job.id, probes, "video job exceeded wait budget");
                    return Err(QissaError::Timeout { duration: max_wait });
                }
                debug!(job_id = %job.id, probes, "job pending, backing off");
                tokio::time::sleep(interval).await;
            }
        }
    }
}
