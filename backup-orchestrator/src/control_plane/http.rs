//! REST client for the backup control plane.
//!
//! Endpoints:
//! - `PUT  /backup-jobs` starts a job and answers `{ "BackupJobId": .. }`
//! - `GET  /backup-jobs/{id}` describes a job
//! - `GET  /backup-jobs/?createdAfter=..&nextToken=..` lists jobs a page at a time
//! - `GET  /tagged-resources?key=..&value=..` resolves a tag to resource ARNs
//!
//! Bodies use the control plane's PascalCase field names. Requests are not
//! retried here; a failed call surfaces as an error to the invocation.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{BackupControlPlane, JobPage, StartJobRequest};
use crate::config::ControlPlaneConfig;
use crate::models::{BackupJob, JobState, ResourceReference, TagSelector};
use crate::utils::errors::{OrchestratorError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StartJobResponse {
    backup_job_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TaggedResourcesResponse {
    #[serde(default)]
    resource_arns: Vec<ResourceReference>,
}

#[derive(Clone)]
pub struct HttpControlPlane {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpControlPlane {
    pub fn new(config: &ControlPlaneConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(OrchestratorError::Config(
                "control plane URL is not set".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| OrchestratorError::Config(format!("invalid control plane token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).timeout(self.timeout)
    }

    /// `backup-jobs/{id}` with the id encoded as a single path segment.
    fn job_url(&self, job_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("backup-jobs"))
            .map_err(|e| OrchestratorError::Config(format!("invalid control plane URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| OrchestratorError::Config("control plane URL cannot be a base".to_string()))?
            .push(job_id);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OrchestratorError::control_plane(
                operation,
                format!("{status}: {body}"),
            ));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BackupControlPlane for HttpControlPlane {
    async fn start_job(&self, request: &StartJobRequest) -> Result<String> {
        let response = self
            .http
            .put(self.url("backup-jobs"))
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;
        let started: StartJobResponse = Self::read_json("startJob", response).await?;
        Ok(started.backup_job_id)
    }

    async fn describe_job(&self, job_id: &str) -> Result<JobState> {
        let response = self
            .http
            .get(self.job_url(job_id)?)
            .timeout(self.timeout)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(OrchestratorError::JobNotFound(job_id.to_string()));
        }
        let job: BackupJob = Self::read_json("describeJob", response).await?;
        Ok(job.state)
    }

    async fn list_jobs(
        &self,
        created_after: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<JobPage> {
        let mut query = vec![(
            "createdAfter",
            created_after.to_rfc3339_opts(SecondsFormat::Secs, true),
        )];
        if let Some(token) = page_token {
            query.push(("nextToken", token.to_string()));
        }
        let response = self.get("backup-jobs/").query(&query).send().await?;
        Self::read_json("listJobs", response).await
    }

    async fn resources_by_tag(&self, tag: &TagSelector) -> Result<Vec<ResourceReference>> {
        let response = self
            .get("tagged-resources")
            .query(&[("key", tag.key.as_str()), ("value", tag.value.as_str())])
            .send()
            .await?;
        let resources: TaggedResourcesResponse =
            Self::read_json("resourcesByTag", response).await?;
        Ok(resources.resource_arns)
    }
}
