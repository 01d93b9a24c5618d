use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the gateway registry service
    pub url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl RegistryConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:4000".to_string(),
            timeout_ms: 10_000,
        }
    }
}
