use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub log_level: String,
    /// TOML file for the orchestrator; environment overrides still apply
    pub orchestrator_config: Option<PathBuf>,
    /// Cron expression (with seconds) for scheduled verification
    pub verify_schedule: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            orchestrator_config: std::env::var("ORCHESTRATOR_CONFIG").ok().map(PathBuf::from),
            verify_schedule: std::env::var("VERIFY_SCHEDULE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}
