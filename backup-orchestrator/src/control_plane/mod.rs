//! Backup control-plane capability.
//!
//! The control plane is authoritative for job state: the engine starts jobs,
//! reads their state back and lists history, but never mutates a job itself.
//! Components receive a [`SharedControlPlane`] at construction.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{BackupJob, JobState, ResourceReference, TagSelector};
use crate::Result;

pub use http::HttpControlPlane;
pub use memory::{ControlPlaneCall, InMemoryControlPlane};

/// Retention applied to the recovery point a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lifecycle {
    pub delete_after_days: u32,
}

/// Parameters of a single `startJob` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartJobRequest {
    pub backup_vault_name: String,
    pub resource_arn: ResourceReference,
    pub iam_role_arn: String,
    pub start_window_minutes: u32,
    pub complete_window_minutes: u32,
    pub lifecycle: Lifecycle,
    pub recovery_point_tags: BTreeMap<String, String>,
}

/// One page of `listJobs` results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobPage {
    #[serde(default)]
    pub backup_jobs: Vec<BackupJob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl JobPage {
    /// The token for the following page. Absent and empty tokens both end pagination.
    pub fn next_page(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|token| !token.is_empty())
    }
}

#[async_trait]
pub trait BackupControlPlane: Send + Sync {
    /// Start a backup job and return its identifier.
    async fn start_job(&self, request: &StartJobRequest) -> Result<String>;

    /// Current state of a job.
    async fn describe_job(&self, job_id: &str) -> Result<JobState>;

    /// One page of jobs created after `created_after`.
    async fn list_jobs(
        &self,
        created_after: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<JobPage>;

    /// Resources carrying `tag`. Control planes without tag lookup report none.
    async fn resources_by_tag(&self, _tag: &TagSelector) -> Result<Vec<ResourceReference>> {
        Ok(Vec::new())
    }
}

pub type SharedControlPlane = Arc<dyn BackupControlPlane>;
