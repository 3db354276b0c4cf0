use crate::state::AppState;
use backup_orchestrator::models::{VerificationReport, VerifyPayload};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Runs vault verification on a cron schedule and keeps the latest report.
pub struct VerifyScheduler {
    scheduler: Mutex<JobScheduler>,
    state: Arc<AppState>,
}

impl VerifyScheduler {
    pub async fn new(state: Arc<AppState>) -> anyhow::Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            state,
        })
    }

    pub async fn schedule(&self, cron_expression: &str) -> anyhow::Result<()> {
        let state = self.state.clone();

        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let state = state.clone();
            Box::pin(async move {
                if let Err(e) = run_verification(&state).await {
                    tracing::error!(error = %e, "Scheduled verification failed");
                }
            })
        })?;

        self.scheduler.lock().await.add(job).await?;
        tracing::info!(cron = %cron_expression, "Verification scheduled");
        Ok(())
    }

    pub async fn start(&self) -> anyhow::Result<()> {
        self.scheduler.lock().await.start().await?;
        Ok(())
    }

    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.scheduler.lock().await.shutdown().await?;
        Ok(())
    }
}

/// Verify the whole vault and store the outcome for `/api/verify/last`.
pub async fn run_verification(state: &AppState) -> anyhow::Result<VerificationReport> {
    let report = state.orchestrator.verify(&VerifyPayload::default()).await?;
    if !report.ok {
        tracing::warn!(
            vault = %state.orchestrator.vault(),
            checked_jobs = report.checked_jobs,
            "No completed backup among the most recent jobs"
        );
    }
    state.record_verification(report.clone()).await;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use backup_orchestrator::clock::ManualClock;
    use backup_orchestrator::control_plane::InMemoryControlPlane;
    use backup_orchestrator::models::{BackupJob, JobState};
    use backup_orchestrator::{Config, Orchestrator};
    use chrono::{TimeZone, Utc};

    fn state(cp: InMemoryControlPlane) -> AppState {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let config = AppConfig {
            port: 0,
            log_level: "info".into(),
            orchestrator_config: None,
            verify_schedule: None,
        };
        let orchestrator = Orchestrator::new(
            &Config::default(),
            Arc::new(cp),
            Arc::new(ManualClock::new(now)),
        );
        AppState::new(config, orchestrator)
    }

    #[tokio::test]
    async fn test_run_verification_records_unhealthy_report() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let state = state(InMemoryControlPlane::new().with_jobs(vec![BackupJob {
            backup_job_id: "j1".into(),
            backup_vault_name: "DRVault".into(),
            resource_arn: Some("r1".into()),
            state: JobState::Failed,
            creation_date: Some(now - chrono::Duration::hours(1)),
        }]));

        let report = run_verification(&state).await.unwrap();

        assert!(!report.ok);
        let last = state.last_verification.read().await.clone().unwrap();
        assert_eq!(last.report, report);
    }

    #[tokio::test]
    async fn test_empty_history_is_still_recorded() {
        let state = state(InMemoryControlPlane::new());
        let report = run_verification(&state).await.unwrap();
        assert_eq!(report.checked_jobs, 0);
        assert!(state.last_verification.read().await.is_some());
    }

    #[tokio::test]
    async fn test_invalid_cron_is_rejected() {
        let scheduler = VerifyScheduler::new(Arc::new(state(InMemoryControlPlane::new())))
            .await
            .unwrap();
        assert!(scheduler.schedule("not a cron").await.is_err());
    }
}
