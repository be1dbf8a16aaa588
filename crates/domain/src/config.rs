//! Configuration structures
//!
//! Every field has a default so partial files and environments deserialize.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_LEVEL;
use crate::types::{AuthRequest, InteractionType};

/// Plugin configuration: interaction style and default login request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(default)]
    pub interaction_type: InteractionType,
    #[serde(default)]
    pub login_request: AuthRequest,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AuthConfig {
    pub const fn new(interaction_type: InteractionType, login_request: AuthRequest) -> Self {
        Self { interaction_type, login_request, logging: LoggingConfig::new() }
    }
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    pub const fn new() -> Self {
        Self { level: String::new(), json: false }
    }

    /// Configured level, or the default when left empty.
    #[must_use]
    pub fn effective_level(&self) -> &str {
        if self.level.trim().is_empty() {
            DEFAULT_LOG_LEVEL
        } else {
            self.level.trim()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level(), json: false }
    }
}

fn default_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
