//! Recency/success rule over filtered job history.

use crate::models::{BackupJob, JobState, JobSummary, VerificationReport};

pub const DEFAULT_WINDOW: usize = 3;

pub struct HealthVerifier {
    window: usize,
}

impl HealthVerifier {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Healthy iff one of the `window` most recently created jobs completed.
    ///
    /// Jobs without a creation date sort as oldest; equal dates order by job
    /// id so the same history always yields the same report.
    pub fn verify(&self, mut jobs: Vec<BackupJob>) -> VerificationReport {
        jobs.sort_by(|a, b| {
            b.creation_date
                .cmp(&a.creation_date)
                .then_with(|| a.backup_job_id.cmp(&b.backup_job_id))
        });
        jobs.truncate(self.window);

        let report = VerificationReport {
            checked_jobs: jobs.len(),
            ok: jobs.iter().any(|job| job.state == JobState::Completed),
            latest_states: jobs.iter().map(JobSummary::from).collect(),
        };

        match serde_json::to_string(&report.summary()) {
            Ok(summary) => tracing::info!(ok = report.ok, %summary, "Backup verification"),
            Err(e) => tracing::warn!(error = %e, "Failed to encode verification summary"),
        }
        report
    }
}

impl Default for HealthVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn job(id: &str, state: JobState, minutes_ago: Option<i64>) -> BackupJob {
        let base = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        BackupJob {
            backup_job_id: id.to_string(),
            backup_vault_name: "DRVault".to_string(),
            resource_arn: Some(format!("arn:res/{id}").into()),
            state,
            creation_date: minutes_ago.map(|m| base - chrono::Duration::minutes(m)),
        }
    }

    #[test]
    fn test_top_three_with_a_completion_is_ok() {
        // Newest first: FAILED, COMPLETED, RUNNING, COMPLETED, FAILED
        let jobs = vec![
            job("j4", JobState::Completed, Some(40)),
            job("j1", JobState::Failed, Some(10)),
            job("j5", JobState::Failed, Some(50)),
            job("j3", JobState::Running, Some(30)),
            job("j2", JobState::Completed, Some(20)),
        ];

        let report = HealthVerifier::default().verify(jobs);

        assert!(report.ok);
        assert_eq!(report.checked_jobs, 3);
        let states: Vec<_> = report.latest_states.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![JobState::Failed, JobState::Completed, JobState::Running]
        );
        assert_eq!(report.latest_states[0].id, "j1");
    }

    #[test]
    fn test_completion_outside_window_is_not_ok() {
        let jobs = vec![
            job("a", JobState::Failed, Some(1)),
            job("b", JobState::Running, Some(2)),
            job("c", JobState::Expired, Some(3)),
            job("d", JobState::Completed, Some(4)),
        ];

        let report = HealthVerifier::default().verify(jobs);
        assert!(!report.ok);
        assert_eq!(report.checked_jobs, 3);
    }

    #[test]
    fn test_no_jobs_is_not_ok() {
        let report = HealthVerifier::default().verify(Vec::new());
        assert!(!report.ok);
        assert_eq!(report.checked_jobs, 0);
        assert!(report.latest_states.is_empty());
    }

    #[test]
    fn test_missing_creation_date_sorts_oldest() {
        let jobs = vec![
            job("undated", JobState::Completed, None),
            job("a", JobState::Failed, Some(5)),
            job("b", JobState::Failed, Some(6)),
            job("c", JobState::Failed, Some(7)),
        ];

        let report = HealthVerifier::default().verify(jobs);
        assert!(!report.ok);
        assert!(report.latest_states.iter().all(|s| s.id != "undated"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = HealthVerifier::default().verify(vec![job("a", JobState::Completed, Some(1))]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "checked_jobs": 1,
                "ok": true,
                "latest_states": [
                    { "id": "a", "state": "COMPLETED", "resource": "arn:res/a" }
                ]
            })
        );
    }

    #[test]
    fn test_summary_keeps_states_only() {
        let report = HealthVerifier::default().verify(vec![
            job("a", JobState::Failed, Some(1)),
            job("b", JobState::Completed, Some(2)),
        ]);
        let summary = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(
            summary,
            serde_json::json!({
                "ok": true,
                "checked_jobs": 2,
                "latest_states": ["FAILED", "COMPLETED"]
            })
        );
    }
}
