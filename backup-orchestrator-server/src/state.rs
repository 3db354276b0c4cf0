use crate::config::AppConfig;
use backup_orchestrator::models::VerificationReport;
use backup_orchestrator::Orchestrator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tokio::sync::RwLock;

/// Outcome of the most recent scheduled verification.
#[derive(Debug, Clone, Serialize)]
pub struct LastVerification {
    pub checked_at: DateTime<Utc>,
    pub report: VerificationReport,
}

pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: Orchestrator,
    pub last_verification: RwLock<Option<LastVerification>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, orchestrator: Orchestrator) -> Self {
        Self {
            config,
            orchestrator,
            last_verification: RwLock::new(None),
            started_at: Instant::now(),
        }
    }

    pub async fn record_verification(&self, report: VerificationReport) {
        let mut last = self.last_verification.write().await;
        *last = Some(LastVerification {
            checked_at: Utc::now(),
            report,
        });
    }
}
