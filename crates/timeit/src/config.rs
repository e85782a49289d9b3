//! Registry configuration
//!
//! Settings can be built in code or loaded from JSON:
//!
//! ```json
//! { "restartPolicy": "onConstruction", "defaultLevel": "debug" }
//! ```
//!
//! Missing fields take their defaults.

use crate::error::{TimeItError, TimeItResult};
use crate::sink::Level;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Template used by the short logging helpers.
pub const DEFAULT_LOG_TEMPLATE: &str = "Code region executed in {Elapsed}";

/// When a registry starts its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RestartPolicy {
    /// Restart when the first reaction is configured. Building the reaction
    /// chain then counts as the start of the region.
    OnFirstReaction,
    /// Restart as soon as the registry is created.
    OnConstruction,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self::OnFirstReaction
    }
}

/// Settings applied to every registry created from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeItConfig {
    pub restart_policy: RestartPolicy,
    /// Level used by `log` and `log_template`
    pub default_level: Level,
    /// Template used by `log` and `log_at`
    pub default_template: String,
}

impl Default for TimeItConfig {
    fn default() -> Self {
        Self {
            restart_policy: RestartPolicy::default(),
            default_level: Level::Trace,
            default_template: DEFAULT_LOG_TEMPLATE.to_string(),
        }
    }
}

impl TimeItConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> TimeItResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            TimeItError::InvalidConfiguration(format!("failed to parse settings: {}", e))
        })
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> TimeItResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        tracing::debug!(
            target: "timeit",
            path = %path.display(),
            restart_policy = ?config.restart_policy,
            "loaded timing settings"
        );
        Ok(config)
    }

    /// Builder method to set the restart policy.
    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    /// Builder method to set the default log level.
    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Builder method to set the default log template.
    pub fn with_default_template(mut self, template: impl Into<String>) -> Self {
        self.default_template = template.into();
        self
    }
}
