//! Backup jobs as reported by the control plane.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::selection::ResourceReference;

/// Lifecycle state of a backup job.
///
/// `Unknown` is both the placeholder for jobs that were never described and
/// the catch-all for states this engine does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Created,
    Pending,
    Running,
    Completed,
    Failed,
    Aborted,
    Expired,
    #[serde(other)]
    Unknown,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Created => "CREATED",
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Completed => "COMPLETED",
            JobState::Failed => "FAILED",
            JobState::Aborted => "ABORTED",
            JobState::Expired => "EXPIRED",
            JobState::Unknown => "UNKNOWN",
        }
    }

    /// A job is still in flight while created, pending or running.
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Created | JobState::Pending | JobState::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BackupJob {
    pub backup_job_id: String,
    #[serde(default)]
    pub backup_vault_name: String,
    #[serde(default)]
    pub resource_arn: Option<ResourceReference>,
    pub state: JobState,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Short form of a job used in verification reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub state: JobState,
    pub resource: Option<ResourceReference>,
}

impl From<&BackupJob> for JobSummary {
    fn from(job: &BackupJob) -> Self {
        Self {
            id: job.backup_job_id.clone(),
            state: job.state,
            resource: job.resource_arn.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        for state in [JobState::Created, JobState::Pending, JobState::Running] {
            assert!(state.is_active(), "{state} should be active");
        }
        for state in [
            JobState::Completed,
            JobState::Failed,
            JobState::Aborted,
            JobState::Expired,
        ] {
            assert!(state.is_terminal(), "{state} should be terminal");
        }
    }

    #[test]
    fn test_unrecognized_state_deserializes_as_unknown() {
        let state: JobState = serde_json::from_str("\"PARTIAL\"").unwrap();
        assert_eq!(state, JobState::Unknown);
    }

    #[test]
    fn test_job_deserialization() {
        let json = r#"{
            "BackupJobId": "job-1",
            "BackupVaultName": "DRVault",
            "ResourceArn": "arn:aws:ec2:::instance/i-1",
            "State": "COMPLETED",
            "CreationDate": "2026-01-02T03:04:05Z"
        }"#;
        let job: BackupJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.backup_job_id, "job-1");
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(
            job.resource_arn.as_ref().map(|r| r.as_str()),
            Some("arn:aws:ec2:::instance/i-1")
        );
        assert!(job.creation_date.is_some());
    }

    #[test]
    fn test_job_without_creation_date() {
        let json = r#"{"BackupJobId": "job-2", "State": "RUNNING"}"#;
        let job: BackupJob = serde_json::from_str(json).unwrap();
        assert!(job.creation_date.is_none());
        assert!(job.resource_arn.is_none());
        assert_eq!(job.backup_vault_name, "");
    }
}
