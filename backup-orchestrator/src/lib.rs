//! Backup Orchestrator Library
//!
//! Launches on-demand backup jobs through a backup control-plane API, waits
//! for them with a bounded timeout, and verifies that recent backups in a
//! vault completed.

pub mod clock;
pub mod config;
pub mod control_plane;
pub mod engine;
pub mod handler;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::Orchestrator;
pub use utils::errors::OrchestratorError;
pub type Result<T> = std::result::Result<T, OrchestratorError>;
