//! Application configuration.
//!
//! Loaded from `<data dir>/config.json`, with `CLAIMB_*` environment variables
//! taking precedence. A missing file yields defaults.

use crate::error::{AppError, AppResult};
use claimb_client::{ClientConfig, RetryConfig, DEFAULT_BASE_URL, DEFAULT_DDRAGON_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";

/// Proxy location and credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyConfig {
    pub base_url: String,
    pub anon_key: String,
    pub app_token: String,
    pub device_id: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            anon_key: String::new(),
            app_token: String::new(),
            device_id: format!("claimb-{}", std::process::id()),
        }
    }
}

/// Network timeouts and retry budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkConfig {
    pub request_timeout_secs: u64,
    pub resource_timeout_secs: u64,
    pub connectivity_grace_secs: u64,
    pub max_attempts: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            resource_timeout_secs: 60,
            connectivity_grace_secs: 2,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub proxy: ProxyConfig,
    pub network: NetworkConfig,
    /// Regional routing value (`europe`, `americas`, `asia`, `sea`).
    pub region: String,
    /// Matches kept per sync page.
    pub match_limit: usize,
    pub ddragon_url: String,
    pub locale: String,
    /// Overrides the default data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::default(),
            network: NetworkConfig::default(),
            region: "europe".to_string(),
            match_limit: 20,
            ddragon_url: DEFAULT_DDRAGON_URL.to_string(),
            locale: "en_US".to_string(),
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Client settings for the proxy.
    pub fn client_config(&self) -> ClientConfig {
        self.client_config_for(&self.proxy.base_url)
    }

    /// Client settings for Data Dragon.
    pub fn ddragon_client_config(&self) -> ClientConfig {
        self.client_config_for(&self.ddragon_url)
    }

    fn client_config_for(&self, base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(self.network.request_timeout_secs),
            resource_timeout: Duration::from_secs(self.network.resource_timeout_secs),
            connectivity_grace: Duration::from_secs(self.network.connectivity_grace_secs),
            retry: RetryConfig { max_attempts: self.network.max_attempts },
        }
    }

    /// Apply `CLAIMB_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CLAIMB_PROXY_URL").filter(|v| !v.trim().is_empty()) {
            self.proxy.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(key) = lookup("CLAIMB_ANON_KEY") {
            self.proxy.anon_key = key;
        }
        if let Some(token) = lookup("CLAIMB_APP_TOKEN") {
            self.proxy.app_token = token;
        }
        if let Some(device) = lookup("CLAIMB_DEVICE_ID") {
            self.proxy.device_id = device;
        }
        if let Some(region) = lookup("CLAIMB_REGION") {
            self.region = region;
        }
        if let Some(limit) = lookup("CLAIMB_MATCH_LIMIT") {
            match limit.parse() {
                Ok(n) => self.match_limit = n,
                Err(_) => tracing::warn!(value = %limit, "CLAIMB_MATCH_LIMIT is not a number, ignoring"),
            }
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.match_limit == 0 {
            return Err(AppError::Config("match_limit must be at least 1".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(AppError::Config("region must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Load configuration from `dir`, then apply environment overrides.
pub fn load_config(dir: &Path) -> AppResult<AppConfig> {
    let mut config = read_config_file(&dir.join(CONFIG_FILE))?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Configuration as saved on disk, without environment overrides.
pub fn read_config_file(path: &Path) -> AppResult<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save configuration atomically (temp file + rename).
pub fn save_config(dir: &Path, config: &AppConfig) -> AppResult<()> {
    let config_path = dir.join(CONFIG_FILE);
    let temp_path = dir.join(format!("{}.tmp", CONFIG_FILE));

    let content = serde_json::to_string_pretty(config)?;
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, &config_path)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = read_config_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.network.max_attempts, 3);
    }

    #[test]
    fn test_save_then_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.region = "americas".to_string();
        config.proxy.app_token = "secret".to_string();
        save_config(dir.path(), &config).unwrap();
        assert!(!dir.path().join("config.json.tmp").exists());

        let loaded = read_config_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(loaded, config);

        fs::write(dir.path().join(CONFIG_FILE), r#"{"match_limit": 5}"#).unwrap();
        let partial = read_config_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(partial.match_limit, 5);
        assert_eq!(partial.region, "europe");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CLAIMB_PROXY_URL", "http://localhost:9000/"),
            ("CLAIMB_APP_TOKEN", "tok"),
            ("CLAIMB_MATCH_LIMIT", "not-a-number"),
            ("CLAIMB_REGION", "asia"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.proxy.base_url, "http://localhost:9000");
        assert_eq!(config.proxy.app_token, "tok");
        assert_eq!(config.region, "asia");
        assert_eq!(config.match_limit, 20);
    }

    #[test]
    fn test_client_config_conversion() {
        let mut config = AppConfig::default();
        config.network.max_attempts = 5;
        config.network.request_timeout_secs = 10;
        let client = config.client_config();
        assert_eq!(client.retry.max_attempts, 5);
        assert_eq!(client.request_timeout, Duration::from_secs(10));
        assert_eq!(config.ddragon_client_config().base_url, DEFAULT_DDRAGON_URL);
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = AppConfig { match_limit: 0, ..AppConfig::default() };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
