use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::OverrideFlags;

/// Everything one orchestration invocation needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Environment the run is deployed against.
    pub environment_id: String,
    /// Application under test.
    pub application_id: String,
    /// Pass the gate even when the run fails.
    #[serde(default)]
    pub continue_on_plan_failure: bool,
    /// Pass the gate even when the service cannot be reached.
    #[serde(default)]
    pub continue_on_system_error: bool,
    /// Poll cadence and bound.
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Poll cadence and bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Wait after the first non-terminal poll.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Upper bound for the doubling wait. Defaults to fixed polling.
    #[serde(default)]
    pub max_interval_ms: Option<u64>,
    /// Give up after this long without a terminal status.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_interval_ms() -> u64 {
    10_000
}

fn default_timeout_ms() -> u64 {
    60 * 60 * 1_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_interval_ms: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl DeploymentConfig {
    /// Config with default polling and no overrides.
    pub fn new(environment_id: impl Into<String>, application_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            application_id: application_id.into(),
            continue_on_plan_failure: false,
            continue_on_system_error: false,
            polling: PollingConfig::default(),
        }
    }

    /// Reads and validates a TOML config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: DeploymentConfig =
            toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("validate {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded deployment config");
        Ok(cfg)
    }

    /// Rejects blank ids and zero durations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "environment_id",
            });
        }
        if self.application_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "application_id",
            });
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "interval_ms",
            });
        }
        if self.polling.timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration { field: "timeout_ms" });
        }
        Ok(())
    }

    /// The two continue flags.
    pub fn override_flags(&self) -> OverrideFlags {
        OverrideFlags {
            continue_on_plan_failure: self.continue_on_plan_failure,
            continue_on_system_error: self.continue_on_system_error,
        }
    }

    /// Base wait between polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    /// Cap for the doubling wait; equals the interval when unset.
    pub fn max_poll_interval(&self) -> Duration {
        self.polling
            .max_interval_ms
            .map_or_else(|| self.poll_interval(), Duration::from_millis)
    }

    /// Overall polling bound.
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.polling.timeout_ms)
    }
}
