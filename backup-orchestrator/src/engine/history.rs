//! Backup job history over the lookback window.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::clock::SharedClock;
use crate::control_plane::SharedControlPlane;
use crate::models::{BackupJob, ResourceReference};
use crate::Result;

pub struct JobHistory {
    control_plane: SharedControlPlane,
    clock: SharedClock,
    lookback: Duration,
}

impl JobHistory {
    pub fn new(control_plane: SharedControlPlane, clock: SharedClock, lookback: Duration) -> Self {
        Self {
            control_plane,
            clock,
            lookback,
        }
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        chrono::Duration::from_std(self.lookback)
            .ok()
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Every job created after `created_after`, across all pages.
    pub async fn fetch_since(&self, created_after: DateTime<Utc>) -> Result<Vec<BackupJob>> {
        let mut jobs = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .control_plane
                .list_jobs(created_after, page_token.as_deref())
                .await?;
            pages += 1;
            page_token = page.next_page().map(String::from);
            jobs.extend(page.backup_jobs);
            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!(pages, jobs = jobs.len(), %created_after, "Fetched backup job history");
        Ok(jobs)
    }

    /// Jobs in the lookback window belonging to `vault`, and to `resource` when given.
    pub async fn recent(
        &self,
        vault: &str,
        resource: Option<&ResourceReference>,
    ) -> Result<Vec<BackupJob>> {
        let jobs = self.fetch_since(self.cutoff()).await?;
        Ok(filter_jobs(jobs, vault, resource))
    }
}

pub fn filter_jobs(
    jobs: Vec<BackupJob>,
    vault: &str,
    resource: Option<&ResourceReference>,
) -> Vec<BackupJob> {
    jobs.into_iter()
        .filter(|job| job.backup_vault_name == vault)
        .filter(|job| resource.map_or(true, |r| job.resource_arn.as_ref() == Some(r)))
        .collect()
}
