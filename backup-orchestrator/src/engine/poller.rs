//! Waits, up to a deadline, for launched jobs to reach a terminal state.
//!
//! Each round describes every job once, in order. Polling stops when a round
//! sees every job terminal, or when the deadline has passed at the start of a
//! round. Running out of time is an inconclusive result, not an error.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::clock::SharedClock;
use crate::control_plane::SharedControlPlane;
use crate::models::{JobState, PollResult};
use crate::Result;

pub struct CompletionPoller {
    control_plane: SharedControlPlane,
    clock: SharedClock,
    interval: Duration,
}

impl CompletionPoller {
    pub fn new(control_plane: SharedControlPlane, clock: SharedClock, interval: Duration) -> Self {
        Self {
            control_plane,
            clock,
            interval,
        }
    }

    pub async fn poll(&self, job_ids: &[String], timeout: Duration) -> Result<PollResult> {
        let mut statuses: BTreeMap<String, JobState> = job_ids
            .iter()
            .map(|id| (id.clone(), JobState::Unknown))
            .collect();

        if timeout.is_zero() {
            return Ok(PollResult {
                statuses,
                timed_out: false,
            });
        }

        let started = self.clock.now();
        let deadline = chrono::Duration::from_std(timeout)
            .ok()
            .and_then(|timeout| started.checked_add_signed(timeout))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut round = 0u32;

        while self.clock.now() < deadline {
            round += 1;
            let mut all_done = true;
            for job_id in job_ids {
                let state = self.control_plane.describe_job(job_id).await?;
                statuses.insert(job_id.clone(), state);
                if state.is_active() {
                    all_done = false;
                }
            }
            tracing::debug!(round, jobs = job_ids.len(), all_done, "Polled backup jobs");

            if all_done {
                return Ok(PollResult {
                    statuses,
                    timed_out: false,
                });
            }
            self.clock.sleep(self.interval).await;
        }

        tracing::warn!(
            timeout_secs = timeout.as_secs(),
            rounds = round,
            "Timed out waiting for backup jobs to finish"
        );
        Ok(PollResult {
            statuses,
            timed_out: true,
        })
    }
}
