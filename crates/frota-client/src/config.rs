//! Client configuration
//!
//! Can be loaded from TOML, from environment variables, or constructed
//! programmatically via the builder. Every knob has a default matching the
//! reference behavior; the client never validates third-party settings
//! beyond failing closed into offline mode.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, Result};
use crate::retry::RetryPolicy;

/// Configuration for the fleet client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the fleet API, versioned path included
    pub base_url: String,

    /// Service-account credentials posted to the auth endpoint
    #[serde(default)]
    pub credentials: Credentials,

    /// External chat endpoint used for AI-authored reports
    #[serde(default)]
    pub chat: ChatConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Response-cache entry lifetime in milliseconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_ms: u64,

    /// Truck ids enumerated by the fleet-wide list synthesis
    #[serde(default = "default_scan_truck_ids")]
    pub scan_truck_ids: Vec<i64>,

    /// Where to persist the session token (absent = in-memory only)
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

/// Service-account credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Chat endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Endpoint URL; unset degrades reports to the local fallback
    #[serde(default)]
    pub url: Option<String>,

    /// API key sent with every chat request
    #[serde(default)]
    pub api_key: Option<String>,

    /// API key header name (default: X-API-Key)
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            api_key_header: default_api_key_header(),
        }
    }
}

fn default_api_key_header() -> String {
    "X-API-Key".to_string()
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Per-attempt request timeout in milliseconds (default: 15s)
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,

    /// Login request timeout in milliseconds (default: 10s)
    #[serde(default = "default_login_timeout")]
    pub login_ms: u64,

    /// Availability probe timeout in milliseconds (default: 5s)
    #[serde(default = "default_probe_timeout")]
    pub probe_ms: u64,

    /// Chat request timeout in milliseconds (default: 30s)
    #[serde(default = "default_chat_timeout")]
    pub chat_ms: u64,

    /// Connect timeout in milliseconds (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_timeout(),
            login_ms: default_login_timeout(),
            probe_ms: default_probe_timeout(),
            chat_ms: default_chat_timeout(),
            connect_ms: default_connect_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    15_000
}

fn default_login_timeout() -> u64 {
    10_000
}

fn default_probe_timeout() -> u64 {
    5_000
}

fn default_chat_timeout() -> u64 {
    30_000
}

fn default_connect_timeout() -> u64 {
    10_000
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries per failure class (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff for transient 5xx in milliseconds, grows linearly
    #[serde(default = "default_backoff")]
    pub server_backoff_ms: u64,

    /// Fixed backoff after timeouts in milliseconds
    #[serde(default = "default_backoff")]
    pub timeout_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            server_backoff_ms: default_backoff(),
            timeout_backoff_ms: default_backoff(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff() -> u64 {
    1_000
}

fn default_cache_ttl() -> u64 {
    30_000
}

fn default_scan_truck_ids() -> Vec<i64> {
    vec![1, 2, 3]
}

fn default_base_url() -> String {
    "http://localhost:8000/v1/api".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: Credentials::default(),
            chat: ChatConfig::default(),
            timeouts: TimeoutsConfig::default(),
            retry: RetryConfig::default(),
            cache_ttl_ms: default_cache_ttl(),
            scan_truck_ids: default_scan_truck_ids(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build a configuration from environment variables.
    ///
    /// Recognized: `FROTA_API_URL`, `FROTA_API_USERNAME`, `FROTA_API_PASSWORD`,
    /// `FROTA_CHAT_URL`, `FROTA_CHAT_API_KEY`. Unset variables keep their
    /// defaults; nothing is validated here.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("FROTA_API_URL") {
            config.base_url = url;
        }
        if let Ok(username) = std::env::var("FROTA_API_USERNAME") {
            config.credentials.username = username;
        }
        if let Ok(password) = std::env::var("FROTA_API_PASSWORD") {
            config.credentials.password = password;
        }
        if let Ok(url) = std::env::var("FROTA_CHAT_URL") {
            config.chat.url = Some(url);
        }
        if let Ok(key) = std::env::var("FROTA_CHAT_API_KEY") {
            config.chat.api_key = Some(key);
        }
        config
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Base URL normalized so relative endpoint paths join under it
    pub(crate) fn parsed_base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(ApiError::from)
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            server_backoff: Duration::from_millis(self.retry.server_backoff_ms),
            timeout_backoff: Duration::from_millis(self.retry.timeout_backoff_ms),
        }
    }

    pub(crate) fn request_budget(&self) -> Duration {
        Duration::from_millis(self.timeouts.request_ms)
    }

    pub(crate) fn login_budget(&self) -> Duration {
        Duration::from_millis(self.timeouts.login_ms)
    }

    pub(crate) fn probe_budget(&self) -> Duration {
        Duration::from_millis(self.timeouts.probe_ms)
    }

    pub(crate) fn chat_budget(&self) -> Duration {
        Duration::from_millis(self.timeouts.chat_ms)
    }

    pub(crate) fn connect_budget(&self) -> Duration {
        Duration::from_millis(self.timeouts.connect_ms)
    }

    pub(crate) fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

/// Builder for ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(base_url),
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Credentials {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    pub fn chat_url(mut self, url: impl Into<String>) -> Self {
        self.config.chat.url = Some(url.into());
        self
    }

    pub fn chat_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.chat.api_key = Some(key.into());
        self
    }

    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.request_ms = ms;
        self
    }

    pub fn login_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.login_ms = ms;
        self
    }

    pub fn probe_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.probe_ms = ms;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    pub fn server_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry.server_backoff_ms = ms;
        self
    }

    pub fn timeout_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry.timeout_backoff_ms = ms;
        self
    }

    pub fn cache_ttl_ms(mut self, ms: u64) -> Self {
        self.config.cache_ttl_ms = ms;
        self
    }

    pub fn scan_truck_ids(mut self, ids: Vec<i64>) -> Self {
        self.config.scan_truck_ids = ids;
        self
    }

    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.session_file = Some(path.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parsing() {
        let toml = r#"
base_url = "http://localhost:9000/v1/api"

[credentials]
username = "svc"
password = "secret123"

[timeouts]
request_ms = 5000

[retry]
max_retries = 1
"#;

        let config = ClientConfig::from_toml(toml).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/v1/api");
        assert_eq!(config.credentials.username, "svc");
        assert_eq!(config.timeouts.request_ms, 5000);
        // Unset fields keep defaults
        assert_eq!(config.timeouts.login_ms, 10_000);
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.cache_ttl_ms, 30_000);
        assert_eq!(config.scan_truck_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder("http://localhost:9000/v1/api")
            .credentials("svc", "secret")
            .chat_url("http://chat.example/chat")
            .chat_api_key("key-1")
            .max_retries(3)
            .cache_ttl_ms(100)
            .scan_truck_ids(vec![7, 8])
            .build();

        assert_eq!(config.credentials.username, "svc");
        assert_eq!(config.chat.url.as_deref(), Some("http://chat.example/chat"));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.cache_ttl_ms, 100);
        assert_eq!(config.scan_truck_ids, vec![7, 8]);
    }

    #[test]
    fn test_base_url_normalization() {
        let config = ClientConfig::new("http://localhost:9000/v1/api");
        let url = config.parsed_base_url().unwrap();
        // Relative joins must land under the versioned path
        assert_eq!(
            url.join("manutencao/caminhao/1").unwrap().as_str(),
            "http://localhost:9000/v1/api/manutencao/caminhao/1"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new("not a url");
        assert!(config.parsed_base_url().is_err());
    }

    #[test]
    fn test_retry_policy_mapping() {
        let config = ClientConfig::builder("http://x")
            .max_retries(5)
            .server_backoff_ms(10)
            .timeout_backoff_ms(20)
            .build();
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.server_backoff, Duration::from_millis(10));
        assert_eq!(policy.timeout_backoff, Duration::from_millis(20));
    }
}
