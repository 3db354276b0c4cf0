//! Configuration management for the backup orchestrator.
//!
//! Loads configuration from an optional TOML file, then applies environment
//! variable overrides (a `.env` file is honoured).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::errors::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
    #[serde(default)]
    pub verify: VerifyConfig,
    #[serde(default)]
    pub control_plane: ControlPlaneConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault jobs are started in and verified against
    #[serde(default = "default_vault_name")]
    pub name: String,

    /// Service role passed to every started job. Empty is accepted here and
    /// rejected by the control plane on the first launch.
    #[serde(default)]
    pub service_role_arn: String,

    /// Tag key used for tag selection; empty disables tag selection
    #[serde(default = "default_tag_key")]
    pub tag_key: String,

    #[serde(default = "default_tag_value")]
    pub tag_value: String,

    /// Placeholder resource used only when nothing else is selected
    #[serde(default = "default_demo_resource_arn")]
    pub demo_resource_arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    #[serde(default = "default_start_window_minutes")]
    pub start_window_minutes: u32,

    #[serde(default = "default_complete_window_minutes")]
    pub complete_window_minutes: u32,

    /// Recovery point retention
    #[serde(default = "default_delete_after_days")]
    pub delete_after_days: u32,

    /// Seconds to wait for launched jobs to finish (0 = don't wait)
    #[serde(default)]
    pub complete_timeout_secs: u64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Append a random suffix to selection names
    #[serde(default)]
    pub unique_selection_names: bool,

    /// Value of the `TriggeredBy` recovery point tag
    #[serde(default = "default_triggered_by")]
    pub triggered_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyConfig {
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u64,

    /// How many of the most recent jobs are inspected
    #[serde(default = "default_verify_window")]
    pub window: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPlaneConfig {
    /// Base URL of the control-plane API
    #[serde(default = "default_control_plane_url")]
    pub url: String,

    /// Bearer token, if the API requires one
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_vault_name() -> String {
    "DRVault".to_string()
}

fn default_tag_key() -> String {
    "Backup".to_string()
}

fn default_tag_value() -> String {
    "Yes".to_string()
}

fn default_demo_resource_arn() -> String {
    "arn:aws:ec2:::instance/i-demo".to_string()
}

fn default_start_window_minutes() -> u32 {
    60
}

fn default_complete_window_minutes() -> u32 {
    120
}

fn default_delete_after_days() -> u32 {
    30
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_triggered_by() -> String {
    "backup-orchestrator".to_string()
}

fn default_lookback_hours() -> u64 {
    26
}

fn default_verify_window() -> usize {
    3
}

fn default_control_plane_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            name: default_vault_name(),
            service_role_arn: String::new(),
            tag_key: default_tag_key(),
            tag_value: default_tag_value(),
            demo_resource_arn: default_demo_resource_arn(),
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            start_window_minutes: default_start_window_minutes(),
            complete_window_minutes: default_complete_window_minutes(),
            delete_after_days: default_delete_after_days(),
            complete_timeout_secs: 0,
            poll_interval_secs: default_poll_interval_secs(),
            unique_selection_names: false,
            triggered_by: default_triggered_by(),
        }
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            window: default_verify_window(),
        }
    }
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            url: default_control_plane_url(),
            token: None,
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault: VaultConfig::default(),
            launch: LaunchConfig::default(),
            verify: VerifyConfig::default(),
            control_plane: ControlPlaneConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// File (or defaults), then `.env` and process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let _ = dotenvy::dotenv();
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from an environment-style lookup. Numeric values that
    /// fail to parse leave the current value in place.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DR_BACKUP_VAULT") {
            self.vault.name = v;
        }
        if let Some(v) = lookup("BACKUP_TAG_KEY") {
            self.vault.tag_key = v;
        }
        if let Some(v) = lookup("BACKUP_TAG_VALUE") {
            self.vault.tag_value = v;
        }
        if let Some(v) = lookup("BACKUP_SERVICE_ROLE_ARN") {
            self.vault.service_role_arn = v;
        }
        if let Some(v) = lookup("DEMO_RESOURCE_ARN") {
            self.vault.demo_resource_arn = v;
        }
        if let Some(v) = lookup("LOOKBACK_HOURS").and_then(|v| v.parse().ok()) {
            self.verify.lookback_hours = v;
        }
        if let Some(v) = lookup("BACKUP_COMPLETE_TIMEOUT_SEC").and_then(|v| v.parse().ok()) {
            self.launch.complete_timeout_secs = v;
        }
        if let Some(v) = lookup("BACKUP_POLL_INTERVAL_SEC").and_then(|v| v.parse().ok()) {
            self.launch.poll_interval_secs = v;
        }
        if let Some(v) = lookup("CONTROL_PLANE_URL") {
            self.control_plane.url = v;
        }
        if let Some(v) = lookup("CONTROL_PLANE_TOKEN") {
            self.control_plane.token = Some(v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log.level = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.vault.name, "DRVault");
        assert_eq!(config.vault.tag_key, "Backup");
        assert_eq!(config.vault.tag_value, "Yes");
        assert_eq!(config.vault.service_role_arn, "");
        assert_eq!(config.verify.lookback_hours, 26);
        assert_eq!(config.verify.window, 3);
        assert_eq!(config.launch.complete_timeout_secs, 0);
        assert_eq!(config.launch.poll_interval_secs, 10);
        assert_eq!(config.launch.start_window_minutes, 60);
        assert_eq!(config.launch.complete_window_minutes, 120);
        assert_eq!(config.launch.delete_after_days, 30);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[vault]
name = "ProdVault"
service_role_arn = "arn:aws:iam::123:role/backup"

[verify]
lookback_hours = 48
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.vault.name, "ProdVault");
        assert_eq!(config.vault.service_role_arn, "arn:aws:iam::123:role/backup");
        assert_eq!(config.vault.tag_key, "Backup");
        assert_eq!(config.verify.lookback_hours, 48);
        assert_eq!(config.verify.window, 3);
        assert_eq!(config.launch, LaunchConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vault\nname = ").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DR_BACKUP_VAULT", "OtherVault"),
            ("BACKUP_TAG_KEY", "Tier"),
            ("BACKUP_TAG_VALUE", "Gold"),
            ("LOOKBACK_HOURS", "12"),
            ("BACKUP_COMPLETE_TIMEOUT_SEC", "300"),
            ("BACKUP_SERVICE_ROLE_ARN", "role"),
            ("DEMO_RESOURCE_ARN", "arn:demo"),
            ("CONTROL_PLANE_URL", "https://backup.internal"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.vault.name, "OtherVault");
        assert_eq!(config.vault.tag_key, "Tier");
        assert_eq!(config.vault.tag_value, "Gold");
        assert_eq!(config.verify.lookback_hours, 12);
        assert_eq!(config.launch.complete_timeout_secs, 300);
        assert_eq!(config.vault.service_role_arn, "role");
        assert_eq!(config.vault.demo_resource_arn, "arn:demo");
        assert_eq!(config.control_plane.url, "https://backup.internal");
    }

    #[test]
    fn test_unparseable_number_keeps_value() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "LOOKBACK_HOURS").then(|| "soon".to_string()));
        assert_eq!(config.verify.lookback_hours, 26);
    }
}
