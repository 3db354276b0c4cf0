//! Backup orchestration engine.
//!
//! Two operations, both driven only through the control-plane capability:
//! - trigger: select resources, launch one job each, optionally wait for them
//! - verify: read job history for the lookback window and judge its health

pub mod history;
pub mod launcher;
pub mod poller;
pub mod selector;
pub mod verifier;

use std::time::Duration;

use crate::clock::SharedClock;
use crate::config::Config;
use crate::control_plane::SharedControlPlane;
use crate::models::{TriggerPayload, TriggerReport, VerificationReport, VerifyPayload};
use crate::Result;

pub use history::JobHistory;
pub use launcher::{JobLauncher, LaunchSettings, LaunchedSelection};
pub use poller::CompletionPoller;
pub use selector::ResourceSelector;
pub use verifier::HealthVerifier;

pub struct Orchestrator {
    vault: String,
    complete_timeout: Duration,
    selector: ResourceSelector,
    launcher: JobLauncher,
    poller: CompletionPoller,
    history: JobHistory,
    verifier: HealthVerifier,
}

impl Orchestrator {
    pub fn new(config: &Config, control_plane: SharedControlPlane, clock: SharedClock) -> Self {
        Self {
            vault: config.vault.name.clone(),
            complete_timeout: Duration::from_secs(config.launch.complete_timeout_secs),
            selector: ResourceSelector::from_config(control_plane.clone(), &config.vault),
            launcher: JobLauncher::new(
                control_plane.clone(),
                clock.clone(),
                LaunchSettings::from_config(config),
            ),
            poller: CompletionPoller::new(
                control_plane.clone(),
                clock.clone(),
                Duration::from_secs(config.launch.poll_interval_secs),
            ),
            history: JobHistory::new(
                control_plane,
                clock,
                Duration::from_secs(config.verify.lookback_hours.saturating_mul(3600)),
            ),
            verifier: HealthVerifier::new(config.verify.window),
        }
    }

    pub fn vault(&self) -> &str {
        &self.vault
    }

    /// Launch backups for the selected resources. Statuses are included only
    /// when a completion wait was requested.
    pub async fn trigger(&self, payload: &TriggerPayload) -> Result<TriggerReport> {
        let selection = self.selector.select(payload);
        let resolved = self.selector.resolve(selection).await?;
        let launched = self.launcher.launch(&resolved).await?;

        let wait = payload
            .wait_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.complete_timeout);

        let (statuses, timed_out) = if wait.is_zero() {
            (None, None)
        } else {
            let result = self.poller.poll(&launched.job_ids, wait).await?;
            (Some(result.statuses), Some(result.timed_out))
        };

        Ok(TriggerReport {
            started_jobs: launched.job_ids,
            selection: launched.selection.kind,
            selection_name: launched.selection.name,
            statuses,
            timed_out,
        })
    }

    pub async fn verify(&self, payload: &VerifyPayload) -> Result<VerificationReport> {
        let jobs = self
            .history
            .recent(&self.vault, payload.resource_filter())
            .await?;
        Ok(self.verifier.verify(jobs))
    }
}
