//! Starts one backup job per selected resource.

use std::collections::BTreeMap;

use crate::clock::SharedClock;
use crate::config::Config;
use crate::control_plane::{Lifecycle, SharedControlPlane, StartJobRequest};
use crate::models::{BackupSelection, ResolvedSelection, ResourceReference};
use crate::Result;

/// Parameters applied to every job a launcher starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub vault_name: String,
    pub service_role_arn: String,
    pub start_window_minutes: u32,
    pub complete_window_minutes: u32,
    pub delete_after_days: u32,
    pub unique_selection_names: bool,
    pub triggered_by: String,
}

impl LaunchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            vault_name: config.vault.name.clone(),
            service_role_arn: config.vault.service_role_arn.clone(),
            start_window_minutes: config.launch.start_window_minutes,
            complete_window_minutes: config.launch.complete_window_minutes,
            delete_after_days: config.launch.delete_after_days,
            unique_selection_names: config.launch.unique_selection_names,
            triggered_by: config.launch.triggered_by.clone(),
        }
    }
}

/// Jobs started for one selection, in resource order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedSelection {
    pub selection: BackupSelection,
    pub job_ids: Vec<String>,
}

pub struct JobLauncher {
    control_plane: SharedControlPlane,
    clock: SharedClock,
    settings: LaunchSettings,
}

impl JobLauncher {
    pub fn new(control_plane: SharedControlPlane, clock: SharedClock, settings: LaunchSettings) -> Self {
        Self {
            control_plane,
            clock,
            settings,
        }
    }

    /// Start jobs sequentially in resource order. The first failure is
    /// returned as is; jobs started before it keep running and show up in
    /// job history.
    pub async fn launch(&self, resolved: &ResolvedSelection) -> Result<LaunchedSelection> {
        let selection = BackupSelection::new(
            resolved.kind,
            self.clock.now(),
            self.settings.unique_selection_names,
        );
        tracing::info!(
            selection = %selection.kind,
            selection_name = %selection.name,
            vault = %self.settings.vault_name,
            resources = resolved.resources.len(),
            "Launching on-demand backups"
        );

        let mut job_ids = Vec::with_capacity(resolved.resources.len());
        for resource in &resolved.resources {
            let request = self.start_request(resource, &selection);
            let job_id = self
                .control_plane
                .start_job(&request)
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        resource = %resource,
                        started = job_ids.len(),
                        started_jobs = ?job_ids,
                        error = %e,
                        "Failed to start backup job"
                    );
                })?;
            tracing::info!(job_id = %job_id, resource = %resource, "Backup job started");
            job_ids.push(job_id);
        }

        Ok(LaunchedSelection { selection, job_ids })
    }

    fn start_request(&self, resource: &ResourceReference, selection: &BackupSelection) -> StartJobRequest {
        let recovery_point_tags = BTreeMap::from([
            ("TriggeredBy".to_string(), self.settings.triggered_by.clone()),
            ("Selection".to_string(), selection.kind.as_str().to_string()),
            ("SelectionName".to_string(), selection.name.clone()),
        ]);
        StartJobRequest {
            backup_vault_name: self.settings.vault_name.clone(),
            resource_arn: resource.clone(),
            iam_role_arn: self.settings.service_role_arn.clone(),
            start_window_minutes: self.settings.start_window_minutes,
            complete_window_minutes: self.settings.complete_window_minutes,
            lifecycle: Lifecycle {
                delete_after_days: self.settings.delete_after_days,
            },
            recovery_point_tags,
        }
    }
}
