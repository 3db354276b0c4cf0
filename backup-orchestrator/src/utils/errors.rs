//! Custom error types for the backup orchestrator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The control plane rejected or failed a call.
    #[error("Control plane {operation} failed: {message}")]
    ControlPlane {
        operation: &'static str,
        message: String,
    },

    #[error("Backup job not found: {0}")]
    JobNotFound(String),

    #[error("Invalid invocation payload: {0}")]
    InvalidPayload(String),
}

impl OrchestratorError {
    pub fn control_plane(operation: &'static str, message: impl Into<String>) -> Self {
        OrchestratorError::ControlPlane {
            operation,
            message: message.into(),
        }
    }

    /// True for failures that originate at the control plane rather than locally.
    pub fn is_control_plane(&self) -> bool {
        matches!(
            self,
            OrchestratorError::ControlPlane { .. }
                | OrchestratorError::JobNotFound(_)
                | OrchestratorError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
