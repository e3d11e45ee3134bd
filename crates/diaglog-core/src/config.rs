use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::reporter::ReporterConfig;
use crate::retry::RetryPolicy;

/// Global configuration loaded from `~/.config/diaglog/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagConfig {
    /// Records older than this many days are pruned after each report.
    pub retention_days: u64,
    /// Default retry budget for callers that do not pass their own.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Optional upper bound on the backoff delay in seconds (None = uncapped).
    #[serde(default)]
    pub max_delay_secs: Option<u64>,
    /// Reports that may wait for the background writer before new ones are dropped.
    pub queue_capacity: usize,
    /// Optional database location; defaults to the XDG state directory.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Default for DiagConfig {
    fn default() -> Self {
        Self {
            retention_days: 7,
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_secs: None,
            queue_capacity: 256,
            db_path: None,
        }
    }
}

impl DiagConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_days.saturating_mul(24 * 60 * 60))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: self.max_delay_secs.map(Duration::from_secs),
        }
    }

    pub fn reporter_config(&self) -> ReporterConfig {
        ReporterConfig {
            retention: self.retention(),
            queue_capacity: self.queue_capacity,
            retry: self.retry_policy(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("diaglog")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DiagConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DiagConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DiagConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = DiagConfig::default();
        assert_eq!(cfg.retention_days, 7);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.base_delay_ms, 1000);
        assert!(cfg.max_delay_secs.is_none());
        assert_eq!(cfg.retention(), Duration::from_secs(7 * 24 * 60 * 60));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = DiagConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: DiagConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.retention_days, cfg.retention_days);
        assert_eq!(parsed.max_retries, cfg.max_retries);
        assert_eq!(parsed.queue_capacity, cfg.queue_capacity);
        assert!(parsed.db_path.is_none());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            retention_days = 30
            max_retries = 5
            base_delay_ms = 250
            max_delay_secs = 60
            queue_capacity = 16
            db_path = "/var/tmp/errors.db"
        "#;
        let cfg: DiagConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.retention(), Duration::from_secs(30 * 24 * 60 * 60));
        let policy = cfg.retry_policy();
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Some(Duration::from_secs(60)));
        assert_eq!(policy.delay_for(20), Duration::from_secs(60));
        let rc = cfg.reporter_config();
        assert_eq!(rc.queue_capacity, 16);
        assert_eq!(cfg.db_path.as_deref(), Some(std::path::Path::new("/var/tmp/errors.db")));
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let toml = r#"
            retention_days = 1
            max_retries = 0
            base_delay_ms = 1000
            queue_capacity = 8
        "#;
        let cfg: DiagConfig = toml::from_str(toml).unwrap();
        assert!(cfg.max_delay_secs.is_none());
        assert!(cfg.retry_policy().max_delay.is_none());
    }
}
