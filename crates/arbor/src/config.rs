//! Runtime configuration.

use std::env;

use serde::{Deserialize, Serialize};

use crate::designer::DESIGNER_ENV;

/// Environment variable holding the log level used by front-ends.
pub const LOG_ENV: &str = "ARBOR_LOG";

/// Default log level.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Process-wide settings that affect how modules are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Running inside a visual designer: modules build views but no
    /// controllers.
    pub designer: bool,
    /// Maximum log level for front-ends, such as `info` or `debug`.
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            designer: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var(DESIGNER_ENV) {
            config.designer = truthy(&v);
        }
        if let Ok(v) = env::var(LOG_ENV) {
            let v = v.trim();
            if !v.is_empty() {
                config.log_level = v.to_string();
            }
        }
        config
    }

    /// Parse configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder-style setter for designer mode.
    pub fn with_designer(mut self, designer: bool) -> Self {
        self.designer = designer;
        self
    }
}

/// Interpret an environment flag.
fn truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
