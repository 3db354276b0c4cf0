//! Reports produced by the trigger and verify operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::job::{JobState, JobSummary};
use super::selection::SelectionKind;

/// Last observed state per job after a completion wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    pub statuses: BTreeMap<String, JobState>,
    /// True when the wait ran out before every job was terminal.
    pub timed_out: bool,
}

impl PollResult {
    pub fn all_terminal(&self) -> bool {
        self.statuses.values().all(JobState::is_terminal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerReport {
    pub started_jobs: Vec<String>,
    pub selection: SelectionKind,
    pub selection_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<BTreeMap<String, JobState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub checked_jobs: usize,
    pub ok: bool,
    /// Newest first.
    pub latest_states: Vec<JobSummary>,
}

impl VerificationReport {
    pub fn summary(&self) -> VerificationSummary {
        VerificationSummary {
            ok: self.ok,
            checked_jobs: self.checked_jobs,
            latest_states: self.latest_states.iter().map(|j| j.state).collect(),
        }
    }
}

/// States-only view of a verification, for log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationSummary {
    pub ok: bool,
    pub checked_jobs: usize,
    pub latest_states: Vec<JobState>,
}
