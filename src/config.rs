//! Configuration management for the client.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::ratelimit::RateLimitConfig;

/// Prefix of environment variables that override file settings,
/// e.g. `RIOT_API_KEY` or `RIOT_DISPATCH__MAX_ATTEMPTS`.
const ENV_PREFIX: &str = "RIOT";

const API_KEY_ENV: &str = "RIOT_API_KEY";

/// Main configuration for the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API credential sent with every request
    #[serde(default)]
    pub api_key: String,

    /// HTTP configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry and deadline configuration
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Provisional rate limits
    #[serde(default)]
    pub rate_limits: RateLimitConfig,
}

/// HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Overrides the per-scope host. `{scope}` is replaced by the scope name.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
            base_url: None,
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("riot-api-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Retry and deadline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Total attempts per call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait before retrying a 429 without `Retry-After`, or a 5xx
    #[serde(default = "default_retry_fallback")]
    pub retry_fallback_ms: u64,

    /// Wait before retrying after a transport failure
    #[serde(default = "default_transport_backoff")]
    pub transport_backoff_ms: u64,

    /// Upper bound of the random delay added to rate limit waits
    #[serde(default = "default_contention_jitter")]
    pub contention_jitter_ms: u64,

    /// Overall bound on one call, including waits and retries
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_fallback_ms: default_retry_fallback(),
            transport_backoff_ms: default_transport_backoff(),
            contention_jitter_ms: default_contention_jitter(),
            deadline_ms: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_fallback() -> u64 {
    1000
}

fn default_transport_backoff() -> u64 {
    1000
}

fn default_contention_jitter() -> u64 {
    50
}

impl DispatchConfig {
    pub fn retry_fallback(&self) -> Duration {
        Duration::from_millis(self.retry_fallback_ms)
    }

    pub fn transport_backoff(&self) -> Duration {
        Duration::from_millis(self.transport_backoff_ms)
    }

    pub fn contention_jitter(&self) -> Duration {
        Duration::from_millis(self.contention_jitter_ms)
    }

    /// Overall bound on one call, if configured.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

impl ClientConfig {
    /// Create a configuration with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a file, with `RIOT_*` environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        let config: ClientConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `RIOT_*` environment variables only.
    pub fn from_env() -> Result<Self> {
        let config = config::Config::builder().add_source(env_source()).build()?;

        let config: ClientConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    ///
    /// An empty `api_key` is taken from `RIOT_API_KEY` when that is set.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse client config: {}", e)))?;
        let config = config.with_fallback_api_key(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    fn with_fallback_api_key(mut self, key: Option<String>) -> Self {
        if self.api_key.trim().is_empty() {
            if let Some(key) = key {
                self.api_key = key;
            }
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.max_attempts == 0 {
            return Err(Error::Config("dispatch.max_attempts must be at least 1".to_string()));
        }
        self.rate_limits.validate()
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("RGAPI-test");
        assert_eq!(config.api_key, "RGAPI-test");
        assert_eq!(config.dispatch.max_attempts, 3);
        assert_eq!(config.dispatch.retry_fallback(), Duration::from_secs(1));
        assert_eq!(config.dispatch.deadline(), None);
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
api_key: RGAPI-yaml
http:
  base_url: "http://127.0.0.1:9000/{scope}"
dispatch:
  max_attempts: 5
  deadline_ms: 30000
rate_limits:
  app_limits: "10:1"
  method_limits:
    get-matchlist: "1000:10"
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api_key, "RGAPI-yaml");
        assert_eq!(config.http.base_url.as_deref(), Some("http://127.0.0.1:9000/{scope}"));
        assert_eq!(config.http.connect_timeout_secs, 5);
        assert_eq!(config.dispatch.max_attempts, 5);
        assert_eq!(config.dispatch.deadline(), Some(Duration::from_secs(30)));
        assert_eq!(config.dispatch.transport_backoff_ms, 1000);
        assert_eq!(config.rate_limits.app_limits, "10:1");
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let result = ClientConfig::from_yaml("dispatch:\n  max_attempts: 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_rate_limits() {
        let result = ClientConfig::from_yaml("rate_limits:\n  app_limits: \"fast\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_api_key_falls_back_to_environment_value() {
        let config = ClientConfig::default()
            .with_fallback_api_key(Some("RGAPI-env".to_string()));
        assert_eq!(config.api_key, "RGAPI-env");

        let config = ClientConfig::new("RGAPI-file")
            .with_fallback_api_key(Some("RGAPI-env".to_string()));
        assert_eq!(config.api_key, "RGAPI-file");

        let config = ClientConfig::default().with_fallback_api_key(None);
        assert_eq!(config.api_key, "");
    }
}
