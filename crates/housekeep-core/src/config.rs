//! Session configuration types.

use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default scan deadline (60 seconds).
pub const DEFAULT_SCAN_TIMEOUT_MS: u64 = 60_000;

/// Settings key holding the watched path.
pub const WATCHED_PATH_KEY: &str = "watched_path";

/// Configuration for the scan-session orchestrator.
///
/// Deserialization goes through the builder, so a config read from disk is
/// validated the same way as one built in code.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(
    setter(into),
    derive(Debug, Deserialize),
    build_fn(validate = "Self::validate")
)]
#[serde(try_from = "SessionConfigBuilder")]
pub struct SessionConfig {
    /// How long to wait for the scanner before giving up, in milliseconds.
    #[builder(default = "DEFAULT_SCAN_TIMEOUT_MS")]
    pub scan_timeout_ms: u64,

    /// Settings key the watched path is persisted under.
    #[builder(default = "WATCHED_PATH_KEY.to_string()")]
    pub settings_key: String,
}

impl TryFrom<SessionConfigBuilder> for SessionConfig {
    type Error = SessionConfigBuilderError;

    fn try_from(builder: SessionConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.scan_timeout_ms == Some(0) {
            return Err("Scan timeout must be greater than zero".to_string());
        }
        if let Some(ref key) = self.settings_key {
            if key.trim().is_empty() {
                return Err("Settings key cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Create a new session config builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// The scan deadline as a [`Duration`].
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan_timeout_ms: DEFAULT_SCAN_TIMEOUT_MS,
            settings_key: WATCHED_PATH_KEY.to_string(),
        }
    }
}
