//! Configuration Management
//!
//! Handles configuration for armsweep: server binding, management API
//! origin, fan-out limits, and the classifier's rule data. Loaded from a
//! JSON file with environment-variable fallbacks for deployment overrides.

use crate::classify::ClassifierConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address to bind the HTTP listener to
    pub bind_address: String,
    /// Port to bind the HTTP listener to
    pub port: u16,
    /// Management API origin (override for sovereign clouds or tests)
    pub arm_base_url: String,
    /// Maximum concurrent remote calls per batch/fan-out
    pub max_concurrency: usize,
    /// Per-HTTP-call timeout in seconds
    pub request_timeout_secs: u64,
    /// Per-batch-item operation timeout in seconds
    pub operation_timeout_secs: u64,
    /// Deprecation rule data
    pub classifier: ClassifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 7071,
            arm_base_url: crate::arm::client::DEFAULT_ARM_BASE_URL.to_string(),
            max_concurrency: 8,
            request_timeout_secs: 30,
            operation_timeout_secs: 60,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("armsweep").join("config.json"))
    }

    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from an explicit file path. Unlike [`Config::load`],
    /// a broken file here is an error the operator should see.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Get effective ARM origin (env > config file)
    pub fn effective_arm_base_url(&self) -> String {
        std::env::var("ARMSWEEP_ARM_BASE_URL").unwrap_or_else(|_| self.arm_base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.port, 7071);
        assert_eq!(config.max_concurrency, 8);
        assert!(config.arm_base_url.starts_with("https://management.azure.com"));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: Config = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.classifier.sql_service_objective_floor, 100);
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.port, config.port);
        assert_eq!(parsed.arm_base_url, config.arm_base_url);
    }
}
