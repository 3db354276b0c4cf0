//! In-memory control plane with scripted responses.
//!
//! Used as the test double throughout the engine and for CLI dry runs. Every
//! call is recorded so callers can assert on exactly what was sent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{BackupControlPlane, JobPage, StartJobRequest};
use crate::clock::{SharedClock, SystemClock};
use crate::models::{BackupJob, JobState, ResourceReference, TagSelector};
use crate::utils::errors::{OrchestratorError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlPlaneCall {
    StartJob(StartJobRequest),
    DescribeJob(String),
    ListJobs {
        created_after: DateTime<Utc>,
        page_token: Option<String>,
    },
    ResourcesByTag(TagSelector),
}

#[derive(Debug)]
struct Inner {
    jobs: Vec<BackupJob>,
    scripts: HashMap<String, VecDeque<JobState>>,
    pages: Option<Vec<JobPage>>,
    tagged: Vec<(TagSelector, ResourceReference)>,
    failing_starts: HashSet<ResourceReference>,
    initial_state: JobState,
    next_id: u64,
    calls: Vec<ControlPlaneCall>,
}

pub struct InMemoryControlPlane {
    inner: Mutex<Inner>,
    clock: SharedClock,
}

impl fmt::Debug for InMemoryControlPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryControlPlane")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                jobs: Vec::new(),
                scripts: HashMap::new(),
                pages: None,
                tagged: Vec::new(),
                failing_starts: HashSet::new(),
                initial_state: JobState::Created,
                next_id: 1,
                calls: Vec::new(),
            }),
            clock: Arc::new(SystemClock),
        }
    }

    /// Clock that stamps the creation date of started jobs.
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Seed job history.
    pub fn with_jobs(mut self, jobs: Vec<BackupJob>) -> Self {
        self.inner.get_mut().jobs.extend(jobs);
        self
    }

    /// Serve `listJobs` from these pages instead of the seeded history. The
    /// first call gets page 0; later calls get the page after the one whose
    /// next token was passed.
    pub fn with_pages(mut self, pages: Vec<JobPage>) -> Self {
        self.inner.get_mut().pages = Some(pages);
        self
    }

    /// States returned by successive `describeJob` calls for `job_id`. The
    /// last state repeats once the script runs out.
    pub fn with_state_script(mut self, job_id: &str, states: Vec<JobState>) -> Self {
        self.inner
            .get_mut()
            .scripts
            .insert(job_id.to_string(), states.into());
        self
    }

    pub fn with_tagged_resource(mut self, tag: TagSelector, resource: ResourceReference) -> Self {
        self.inner.get_mut().tagged.push((tag, resource));
        self
    }

    /// Make `startJob` fail for this resource.
    pub fn failing_start_for(mut self, resource: ResourceReference) -> Self {
        self.inner.get_mut().failing_starts.insert(resource);
        self
    }

    /// State newly started jobs report until scripted otherwise.
    pub fn with_initial_state(mut self, state: JobState) -> Self {
        self.inner.get_mut().initial_state = state;
        self
    }

    pub async fn calls(&self) -> Vec<ControlPlaneCall> {
        self.inner.lock().await.calls.clone()
    }

    pub async fn start_requests(&self) -> Vec<StartJobRequest> {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                ControlPlaneCall::StartJob(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn describe_count(&self) -> usize {
        self.count(|call| matches!(call, ControlPlaneCall::DescribeJob(_)))
            .await
    }

    pub async fn list_count(&self) -> usize {
        self.count(|call| matches!(call, ControlPlaneCall::ListJobs { .. }))
            .await
    }

    pub async fn jobs(&self) -> Vec<BackupJob> {
        self.inner.lock().await.jobs.clone()
    }

    async fn count(&self, predicate: impl Fn(&ControlPlaneCall) -> bool) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }
}

impl Default for InMemoryControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackupControlPlane for InMemoryControlPlane {
    async fn start_job(&self, request: &StartJobRequest) -> Result<String> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ControlPlaneCall::StartJob(request.clone()));

        if inner.failing_starts.contains(&request.resource_arn) {
            return Err(OrchestratorError::control_plane(
                "startJob",
                format!("access denied for {}", request.resource_arn),
            ));
        }

        let job_id = format!("job-{}", inner.next_id);
        inner.next_id += 1;
        let state = inner.initial_state;
        inner.jobs.push(BackupJob {
            backup_job_id: job_id.clone(),
            backup_vault_name: request.backup_vault_name.clone(),
            resource_arn: Some(request.resource_arn.clone()),
            state,
            creation_date: Some(self.clock.now()),
        });
        Ok(job_id)
    }

    async fn describe_job(&self, job_id: &str) -> Result<JobState> {
        let mut inner = self.inner.lock().await;
        inner
            .calls
            .push(ControlPlaneCall::DescribeJob(job_id.to_string()));

        let scripted = inner.scripts.get_mut(job_id).and_then(|script| {
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().copied()
            }
        });

        let job = inner.jobs.iter_mut().find(|j| j.backup_job_id == job_id);
        match (scripted, job) {
            (Some(state), Some(job)) => {
                job.state = state;
                Ok(state)
            }
            (Some(state), None) => Ok(state),
            (None, Some(job)) => Ok(job.state),
            (None, None) => Err(OrchestratorError::JobNotFound(job_id.to_string())),
        }
    }

    async fn list_jobs(
        &self,
        created_after: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<JobPage> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ControlPlaneCall::ListJobs {
            created_after,
            page_token: page_token.map(String::from),
        });

        if let Some(pages) = &inner.pages {
            let index = match page_token {
                None => Some(0),
                Some(token) => pages
                    .iter()
                    .position(|page| page.next_page() == Some(token))
                    .map(|i| i + 1),
            };
            return index
                .and_then(|i| pages.get(i).cloned())
                .ok_or_else(|| {
                    OrchestratorError::control_plane(
                        "listJobs",
                        format!("invalid page token {page_token:?}"),
                    )
                });
        }

        let backup_jobs = inner
            .jobs
            .iter()
            .filter(|job| job.creation_date.is_some_and(|created| created > created_after))
            .cloned()
            .collect();
        Ok(JobPage {
            backup_jobs,
            next_token: None,
        })
    }

    async fn resources_by_tag(&self, tag: &TagSelector) -> Result<Vec<ResourceReference>> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ControlPlaneCall::ResourcesByTag(tag.clone()));
        Ok(inner
            .tagged
            .iter()
            .filter(|(t, _)| t == tag)
            .map(|(_, resource)| resource.clone())
            .collect())
    }
}
