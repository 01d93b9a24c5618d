//! Configuration types for the gwcompare system

mod query;
mod registry;

pub use query::QueryDefaults;
pub use registry::RegistryConfig;

use {
    serde::{Deserialize, Serialize},
    std::{fs, path::Path},
};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub service_name: String,
    pub bind_address: String,
    pub path_prefix: Option<String>,
    pub enable_metrics: bool,
    pub log_level: String,
    pub registry: RegistryConfig,
    pub query: QueryDefaults,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "gwcompare-api".to_string(),
            bind_address: "0.0.0.0:3001".to_string(),
            path_prefix: Some("/api".to_string()),
            enable_metrics: true,
            log_level: "info".to_string(),
            registry: RegistryConfig::default(),
            query: QueryDefaults::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str::<Self>(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.registry.url.trim().is_empty() {
            return Err(Error::Config("registry url must not be empty".to_string()));
        }
        if self.registry.timeout_ms == 0 {
            return Err(Error::Config("registry timeout must be positive".to_string()));
        }
        if let Some(prefix) = &self.path_prefix {
            if !prefix.starts_with('/') {
                return Err(Error::Config(format!(
                    "path prefix must start with '/': {prefix}"
                )));
            }
        }
        Ok(())
    }
}
