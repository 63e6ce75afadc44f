//! Configuration types for video-dl

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable overriding [`ApiConfig::base_url`]
pub const ENV_API_BASE_URL: &str = "VIDEO_DL_API_BASE_URL";
/// Environment variable overriding [`PollingConfig::interval`] (milliseconds)
pub const ENV_POLLING_INTERVAL: &str = "VIDEO_DL_POLLING_INTERVAL";
/// Environment variable overriding [`ApiConfig::accept_language`]
pub const ENV_DEFAULT_LANGUAGE: &str = "VIDEO_DL_DEFAULT_LANGUAGE";

/// Worker API paths, relative to [`ApiConfig::base_url`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Video metadata (`GET ?url=`)
    #[serde(default = "default_info_path")]
    pub info: String,
    /// Task creation (`POST`)
    #[serde(default = "default_download_path")]
    pub download: String,
    /// Task listing (`GET`)
    #[serde(default = "default_tasks_path")]
    pub tasks: String,
    /// Task cancellation prefix (`DELETE <cancel>/<id>`)
    #[serde(default = "default_tasks_path")]
    pub cancel: String,
    /// Supported services (`GET`)
    #[serde(default = "default_services_path")]
    pub services: String,
    /// Direct file retrieval prefix (`<files>/<filename>`)
    #[serde(default = "default_files_path")]
    pub files: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            info: default_info_path(),
            download: default_download_path(),
            tasks: default_tasks_path(),
            cancel: default_tasks_path(),
            services: default_services_path(),
            files: default_files_path(),
        }
    }
}

/// Worker API connection settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the worker API (default: "http://localhost:8080")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endpoint paths
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_ms_serde")]
    pub request_timeout: Duration,

    /// Value sent as `Accept-Language` (default: "en")
    #[serde(default = "default_language")]
    pub accept_language: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: Endpoints::default(),
            request_timeout: default_request_timeout(),
            accept_language: default_language(),
        }
    }
}

/// Status polling settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Period between refreshes (default: 3000 ms)
    #[serde(default = "default_poll_interval", with = "duration_ms_serde")]
    pub interval: Duration,

    /// Start polling as part of [`DownloadClient::initialize`](crate::DownloadClient::initialize)
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            auto_start: true,
        }
    }
}

/// Main configuration for DownloadClient
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Worker API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Status polling
    #[serde(default)]
    pub polling: PollingConfig,

    /// Reject URLs of unsupported services locally, once the supported
    /// service list is loaded (default: true)
    #[serde(default = "default_true")]
    pub validate_urls: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            polling: PollingConfig::default(),
            validate_urls: true,
        }
    }
}

impl Config {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay `VIDEO_DL_*` environment variables onto this configuration
    ///
    /// Empty variables are ignored. An interval that is not a positive
    /// integer is a configuration error.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(base_url) = env_value(ENV_API_BASE_URL) {
            self.api.base_url = base_url;
        }
        if let Some(language) = env_value(ENV_DEFAULT_LANGUAGE) {
            self.api.accept_language = language;
        }
        if let Some(raw) = env_value(ENV_POLLING_INTERVAL) {
            let millis: u64 = raw.parse().map_err(|_| Error::Config {
                message: format!("polling interval must be milliseconds, got '{}'", raw),
                key: Some(ENV_POLLING_INTERVAL.to_string()),
            })?;
            self.polling.interval = Duration::from_millis(millis);
        }
        Ok(())
    }

    /// Check the settings the client cannot work without
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", self.api.base_url, e),
            key: Some("api.base_url".to_string()),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("base URL '{}' cannot carry paths", self.api.base_url),
                key: Some("api.base_url".to_string()),
            });
        }
        if self.polling.interval.is_zero() {
            return Err(Error::Config {
                message: "polling interval must be greater than zero".to_string(),
                key: Some("polling.interval".to_string()),
            });
        }
        if self.api.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request timeout must be greater than zero".to_string(),
                key: Some("api.request_timeout".to_string()),
            });
        }
        Ok(())
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_info_path() -> String {
    "/api/info".to_string()
}

fn default_download_path() -> String {
    "/api/download".to_string()
}

fn default_tasks_path() -> String {
    "/api/tasks".to_string()
}

fn default_services_path() -> String {
    "/api/services".to_string()
}

fn default_files_path() -> String {
    "/api/downloads".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(3000)
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (integer milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
