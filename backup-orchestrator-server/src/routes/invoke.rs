use crate::error::AppError;
use crate::state::{AppState, LastVerification};
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use backup_orchestrator::handler;
use backup_orchestrator::models::InvocationResponse;
use serde_json::Value;
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trigger", post(trigger))
        .route("/verify", post(verify))
        .route("/verify/last", get(last_verification))
}

/// An empty body is an empty event, as with a scheduled invocation.
fn parse_event(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
}

async fn trigger(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<InvocationResponse>, AppError> {
    let event = parse_event(&body)?;
    let response = handler::handle_trigger(&state.orchestrator, event).await?;
    Ok(Json(response))
}

async fn verify(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<InvocationResponse>, AppError> {
    let event = parse_event(&body)?;
    let response = handler::handle_verify(&state.orchestrator, event).await?;
    Ok(Json(response))
}

async fn last_verification(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LastVerification>, AppError> {
    match state.last_verification.read().await.clone() {
        Some(last) => Ok(Json(last)),
        None => Err(AppError::NotFound("No scheduled verification has run yet".into())),
    }
}
