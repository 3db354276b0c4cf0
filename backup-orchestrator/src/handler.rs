//! Invocation entry points: raw JSON event in, `{ statusCode, body }` out.

use serde_json::Value;

use crate::engine::Orchestrator;
use crate::models::{parse_payload, InvocationResponse, TriggerPayload, VerifyPayload};
use crate::Result;

pub async fn handle_trigger(orchestrator: &Orchestrator, event: Value) -> Result<InvocationResponse> {
    let payload: TriggerPayload = parse_payload(event)?;
    let report = orchestrator.trigger(&payload).await?;
    InvocationResponse::ok(&report)
}

pub async fn handle_verify(orchestrator: &Orchestrator, event: Value) -> Result<InvocationResponse> {
    let payload: VerifyPayload = parse_payload(event)?;
    let report = orchestrator.verify(&payload).await?;
    InvocationResponse::ok(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::control_plane::InMemoryControlPlane;
    use crate::models::{BackupJob, JobState};
    use crate::OrchestratorError;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;

    fn orchestrator(cp: InMemoryControlPlane) -> Orchestrator {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        Orchestrator::new(&Config::default(), Arc::new(cp), Arc::new(ManualClock::new(now)))
    }

    #[tokio::test]
    async fn test_trigger_response_body() {
        let response = handle_trigger(
            &orchestrator(InMemoryControlPlane::new()),
            json!({ "resource_arns": ["r1", "r2"] }),
        )
        .await
        .unwrap();

        assert_eq!(response.status_code, 200);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["started_jobs"], json!(["job-1", "job-2"]));
        assert_eq!(body["selection"], "Explicit");
        assert_eq!(body["selection_name"], "on-demand-20261015T120000Z");
        assert!(body.get("statuses").is_none());
    }

    #[tokio::test]
    async fn test_verify_response_body() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let cp = InMemoryControlPlane::new().with_jobs(vec![BackupJob {
            backup_job_id: "j1".into(),
            backup_vault_name: "DRVault".into(),
            resource_arn: Some("r1".into()),
            state: JobState::Completed,
            creation_date: Some(now - chrono::Duration::hours(2)),
        }]);

        let response = handle_verify(&orchestrator(cp), json!({ "resource_arn": "r1" }))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body,
            r#"{"checked_jobs":1,"ok":true,"latest_states":[{"id":"j1","state":"COMPLETED","resource":"r1"}]}"#
        );
    }

    #[tokio::test]
    async fn test_launch_failure_has_no_partial_report() {
        let cp = InMemoryControlPlane::new().failing_start_for("r2".into());
        let err = handle_trigger(&orchestrator(cp), json!({ "resource_arns": ["r1", "r2"] }))
            .await
            .unwrap_err();
        assert!(err.is_control_plane());
    }

    #[tokio::test]
    async fn test_bad_payload() {
        let err = handle_verify(
            &orchestrator(InMemoryControlPlane::new()),
            json!({ "resource_arn": 42 }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidPayload(_)));
    }
}
