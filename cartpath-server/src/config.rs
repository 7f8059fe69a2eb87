//! Server configuration read from a TOML file

use std::{error::Error, path::Path, path::PathBuf};

use cartpath_core::{RouteConfig, StoreGraphConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub store: StoreConfig,
    pub route: RouteConfig,
    pub crowd: CrowdConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 10,
            max_concurrent_requests: 64,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON section list; the embedded supercenter layout when absent
    pub layout_path: Option<PathBuf>,
    #[serde(flatten)]
    pub graph: StoreGraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrowdConfig {
    /// Seconds between crowd level samples
    pub refresh_secs: u64,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self { refresh_secs: 30 }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {e}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Rejects values that would leave the service unusable
    pub fn validate(&self) -> Result<(), String> {
        let pace = self.route.distance_per_minute;
        if pace.is_nan() || pace <= 0.0 {
            return Err(format!(
                "route.distance_per_minute must be positive, got {pace}"
            ));
        }
        if self.server.max_concurrent_requests == 0 {
            return Err("server.max_concurrent_requests must be at least 1".to_string());
        }
        Ok(())
    }
}
