//! Invocation payloads and the response envelope shared by both operations.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::selection::ResourceReference;
use crate::utils::errors::{OrchestratorError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TriggerPayload {
    #[serde(default)]
    pub resource_arns: Option<Vec<ResourceReference>>,
    /// Overrides the configured completion wait for this invocation.
    #[serde(default)]
    pub wait_seconds: Option<u64>,
}

impl TriggerPayload {
    /// Explicit resources, if the payload names at least one.
    pub fn explicit_resources(&self) -> Option<&[ResourceReference]> {
        self.resource_arns
            .as_deref()
            .filter(|resources| !resources.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VerifyPayload {
    #[serde(default)]
    pub resource_arn: Option<ResourceReference>,
}

impl VerifyPayload {
    /// Resource to restrict history to. An empty reference means no filter.
    pub fn resource_filter(&self) -> Option<&ResourceReference> {
        self.resource_arn
            .as_ref()
            .filter(|resource| !resource.as_str().is_empty())
    }
}

/// Parse a raw invocation event. Null and non-object events count as empty payloads.
pub fn parse_payload<T>(event: Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !event.is_object() {
        return Ok(T::default());
    }
    serde_json::from_value(event).map_err(|e| OrchestratorError::InvalidPayload(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded report.
    pub body: String,
}

impl InvocationResponse {
    pub fn ok<T: Serialize>(report: &T) -> Result<Self> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(report)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_event_is_empty_payload() {
        let payload: TriggerPayload = parse_payload(Value::Null).unwrap();
        assert_eq!(payload, TriggerPayload::default());
    }

    #[test]
    fn test_non_object_event_is_empty_payload() {
        let payload: VerifyPayload = parse_payload(json!(["r1"])).unwrap();
        assert!(payload.resource_arn.is_none());
    }

    #[test]
    fn test_empty_resource_list_is_not_explicit() {
        let payload: TriggerPayload = parse_payload(json!({ "resource_arns": [] })).unwrap();
        assert!(payload.explicit_resources().is_none());
    }

    #[test]
    fn test_empty_resource_arn_is_no_filter() {
        let payload: VerifyPayload = parse_payload(json!({ "resource_arn": "" })).unwrap();
        assert!(payload.resource_filter().is_none());

        let payload: VerifyPayload = parse_payload(json!({ "resource_arn": "r1" })).unwrap();
        assert_eq!(payload.resource_filter().map(|r| r.as_str()), Some("r1"));
    }

    #[test]
    fn test_malformed_payload_is_rejected() {
        let err = parse_payload::<TriggerPayload>(json!({ "resource_arns": "r1" })).unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidPayload(_)));
    }

    #[test]
    fn test_response_envelope_shape() {
        let response = InvocationResponse::ok(&json!({ "ok": true })).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "statusCode": 200, "body": "{\"ok\":true}" }));
    }
}
