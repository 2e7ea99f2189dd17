use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{ClientError, Result};

pub const ENV_CONSOLE_URL: &str = "PCC_CONSOLE_URL";
pub const ENV_USERNAME: &str = "PCC_USERNAME";
pub const ENV_PASSWORD: &str = "PCC_PASSWORD";
pub const ENV_SKIP_CERT_VERIFICATION: &str = "PCC_SKIP_CERT_VERIFICATION";
pub const ENV_TIMEOUT_SECS: &str = "PCC_TIMEOUT_SECS";

/// Connection settings for a Compute console.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Console base URL (e.g., https://console.example.com:8083)
    #[serde(default)]
    pub console_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Accept self-signed console certificates
    #[serde(default)]
    pub skip_cert_verification: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Load config from file
    pub fn from_file(path: &str) -> Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            return Err(ClientError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ClientError::ConfigError(format!("Invalid YAML: {}", e)))
    }

    /// Load config from environment or defaults
    pub fn from_env() -> Self {
        ClientConfig::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay environment variables on top of file values.
    pub fn apply_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values returned by `lookup` for the `PCC_*` keys.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_CONSOLE_URL) {
            self.console_url = url;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = password;
        }
        if let Some(skip) = lookup(ENV_SKIP_CERT_VERIFICATION) {
            self.skip_cert_verification = skip == "true" || skip == "1";
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS).and_then(|t| t.parse().ok()) {
            self.timeout_secs = timeout;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.console_url.trim().is_empty() {
            return Err(ClientError::ConfigError(
                "console_url must be set".to_string(),
            ));
        }
        if !self.console_url.starts_with("http://") && !self.console_url.starts_with("https://") {
            return Err(ClientError::ConfigError(format!(
                "console_url must start with http:// or https://: {}",
                self.console_url
            )));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ClientError::ConfigError(
                "username and password must be set".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Console URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.console_url.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            console_url: String::new(),
            username: String::new(),
            password: String::new(),
            skip_cert_verification: false,
            timeout_secs: default_timeout(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("console_url", &self.console_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("skip_cert_verification", &self.skip_cert_verification)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

pub fn default_timeout() -> u64 {
    30
}
