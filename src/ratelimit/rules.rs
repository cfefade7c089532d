//! Rate limit rules: parsing the server's `limit:window` headers and the
//! provisional limits used before the first response arrives.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::descriptor::EndpointKey;
use crate::error::{Error, Result};

pub const APP_RATE_LIMIT_HEADER: &str = "x-app-rate-limit";
pub const APP_RATE_LIMIT_COUNT_HEADER: &str = "x-app-rate-limit-count";
pub const METHOD_RATE_LIMIT_HEADER: &str = "x-method-rate-limit";
pub const METHOD_RATE_LIMIT_COUNT_HEADER: &str = "x-method-rate-limit-count";
pub const RATE_LIMIT_TYPE_HEADER: &str = "x-rate-limit-type";
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// A single `limit:window` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateLimitRule {
    /// Maximum requests allowed per window
    pub limit: u64,
    /// Length of the window
    pub window: Duration,
}

impl RateLimitRule {
    /// Create a rule of `limit` requests per `window_secs` seconds.
    pub fn new(limit: u64, window_secs: u64) -> Self {
        Self {
            limit,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Current count the server reports for one window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    pub count: u64,
    pub window: Duration,
}

/// Authoritative limits and counts for one bucket, as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerLimits {
    pub rules: Vec<RateLimitRule>,
    pub counts: Vec<WindowCount>,
}

impl ServerLimits {
    /// Count reported for a window length, 0 when the server did not report one.
    pub fn count_for(&self, window: Duration) -> u64 {
        self.counts
            .iter()
            .find(|c| c.window == window)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Parse application-wide limits from response headers.
    ///
    /// Returns `None` when the limits header is absent or empty.
    pub fn application(headers: &HeaderMap) -> Option<Self> {
        Self::from_headers(headers, APP_RATE_LIMIT_HEADER, APP_RATE_LIMIT_COUNT_HEADER)
    }

    /// Parse per-method limits from response headers.
    pub fn method(headers: &HeaderMap) -> Option<Self> {
        Self::from_headers(headers, METHOD_RATE_LIMIT_HEADER, METHOD_RATE_LIMIT_COUNT_HEADER)
    }

    fn from_headers(headers: &HeaderMap, limit_header: &str, count_header: &str) -> Option<Self> {
        let rules = parse_rules(header_str(headers, limit_header)?);
        if rules.is_empty() {
            return None;
        }

        let counts = header_str(headers, count_header)
            .map(|v| {
                parse_pairs(v)
                    .into_iter()
                    .map(|(count, secs)| WindowCount {
                        count,
                        window: Duration::from_secs(secs),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { rules, counts })
    }
}

/// Which limit a 429 response says was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitType {
    Application,
    Method,
    Service,
}

impl RateLimitType {
    /// Read `X-Rate-Limit-Type`. Unrecognized values yield `None`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        match header_str(headers, RATE_LIMIT_TYPE_HEADER)?.trim() {
            "application" => Some(RateLimitType::Application),
            "method" => Some(RateLimitType::Method),
            "service" => Some(RateLimitType::Service),
            _ => None,
        }
    }
}

/// Parse the `Retry-After` header as whole seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    header_str(headers, RETRY_AFTER_HEADER)?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Parse a `limit:window,limit:window` list into rules.
///
/// Malformed entries and zero-length windows are skipped.
pub fn parse_rules(value: &str) -> Vec<RateLimitRule> {
    parse_pairs(value)
        .into_iter()
        .filter(|(_, secs)| *secs > 0)
        .map(|(limit, secs)| RateLimitRule::new(limit, secs))
        .collect()
}

fn parse_pairs(value: &str) -> Vec<(u64, u64)> {
    value
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let parsed = entry.trim().split_once(':').and_then(|(a, b)| {
                Some((a.trim().parse::<u64>().ok()?, b.trim().parse::<u64>().ok()?))
            });
            if parsed.is_none() {
                debug!(entry = %entry, "Skipping malformed rate limit entry");
            }
            parsed
        })
        .collect()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Provisional limits applied to buckets before the server has reported any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Application-wide rules, e.g. `20:1,100:120`
    #[serde(default = "default_app_limits")]
    pub app_limits: String,

    /// Rules for endpoints without an explicit entry in `method_limits`
    #[serde(default = "default_method_limits")]
    pub default_method_limits: String,

    /// Per-endpoint rules, keyed by endpoint key (e.g. `get-match`)
    #[serde(default)]
    pub method_limits: HashMap<String, String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            app_limits: default_app_limits(),
            default_method_limits: default_method_limits(),
            method_limits: HashMap::new(),
        }
    }
}

fn default_app_limits() -> String {
    "20:1,100:120".to_string()
}

fn default_method_limits() -> String {
    "500:10".to_string()
}

impl RateLimitConfig {
    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse rate limit config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every rule string parses and names a known endpoint.
    pub fn validate(&self) -> Result<()> {
        strict_rules("app_limits", &self.app_limits)?;
        strict_rules("default_method_limits", &self.default_method_limits)?;
        for (key, rules) in &self.method_limits {
            key.parse::<EndpointKey>().map_err(Error::Config)?;
            strict_rules(key, rules)?;
        }
        Ok(())
    }

    /// Provisional rules for a new application-wide bucket.
    pub fn app_rules(&self) -> Vec<RateLimitRule> {
        parse_rules(&self.app_limits)
    }

    /// Provisional rules for a new per-method bucket, falling back to `default_method_limits`.
    pub fn method_rules(&self, endpoint: EndpointKey) -> Vec<RateLimitRule> {
        let rules = self
            .method_limits
            .get(endpoint.as_str())
            .unwrap_or(&self.default_method_limits);
        parse_rules(rules)
    }
}

fn strict_rules(name: &str, value: &str) -> Result<()> {
    let entries = value.split(',').filter(|e| !e.trim().is_empty()).count();
    if entries == 0 || parse_rules(value).len() != entries {
        return Err(Error::Config(format!(
            "invalid rate limit rules for {}: {:?}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_parse_rules() {
        let rules = parse_rules("20:1,100:120");
        assert_eq!(rules, vec![RateLimitRule::new(20, 1), RateLimitRule::new(100, 120)]);
    }

    #[test]
    fn test_parse_rules_skips_malformed() {
        let rules = parse_rules("20:1, bogus ,5:x,,7:0,100:120");
        assert_eq!(rules, vec![RateLimitRule::new(20, 1), RateLimitRule::new(100, 120)]);
    }

    #[test]
    fn test_server_limits_from_headers() {
        let map = headers(&[
            ("x-app-rate-limit", "20:1,100:120"),
            ("x-app-rate-limit-count", "3:1,41:120"),
            ("x-method-rate-limit", "2000:10"),
        ]);

        let app = ServerLimits::application(&map).unwrap();
        assert_eq!(app.rules.len(), 2);
        assert_eq!(app.count_for(Duration::from_secs(1)), 3);
        assert_eq!(app.count_for(Duration::from_secs(120)), 41);

        let method = ServerLimits::method(&map).unwrap();
        assert_eq!(method.rules, vec![RateLimitRule::new(2000, 10)]);
        assert_eq!(method.count_for(Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_absent_headers() {
        let map = headers(&[("x-method-rate-limit", "")]);
        assert!(ServerLimits::application(&map).is_none());
        assert!(ServerLimits::method(&map).is_none());
        assert!(retry_after(&map).is_none());
        assert!(RateLimitType::from_headers(&map).is_none());
    }

    #[test]
    fn test_retry_after_and_type() {
        let map = headers(&[("retry-after", "2"), ("x-rate-limit-type", "method")]);
        assert_eq!(retry_after(&map), Some(Duration::from_secs(2)));
        assert_eq!(RateLimitType::from_headers(&map), Some(RateLimitType::Method));
    }

    #[test]
    fn test_config_method_rules() {
        let yaml = r#"
app_limits: "20:1,100:120"
default_method_limits: "100:10"
method_limits:
  get-match: "2000:10"
"#;
        let config = RateLimitConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.method_rules(EndpointKey::GetMatch),
            vec![RateLimitRule::new(2000, 10)]
        );
        assert_eq!(
            config.method_rules(EndpointKey::GetMatchlist),
            vec![RateLimitRule::new(100, 10)]
        );
        assert_eq!(config.app_rules().len(), 2);
    }

    #[test]
    fn test_config_rejects_bad_rules() {
        assert!(RateLimitConfig::from_yaml("app_limits: \"20:1,oops\"").is_err());
        assert!(RateLimitConfig::from_yaml("method_limits:\n  get-nothing: \"1:1\"").is_err());
        assert!(RateLimitConfig::from_yaml("default_method_limits: \"\"").is_err());
    }
}
