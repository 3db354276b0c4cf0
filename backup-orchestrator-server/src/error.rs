use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use backup_orchestrator::OrchestratorError;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ControlPlane(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<OrchestratorError> for AppError {
    fn from(e: OrchestratorError) -> Self {
        match e {
            OrchestratorError::InvalidPayload(m) => AppError::BadRequest(m),
            e if e.is_control_plane() => AppError::ControlPlane(e.to_string()),
            e => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::ControlPlane(m) => {
                tracing::error!("Control plane error: {m}");
                (StatusCode::BAD_GATEWAY, m.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}
