//! Proxy Configuration Settings
//!
//! Configuration types for the data proxy, loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use crate::domain::cache::DEFAULT_CACHE_TTL;

/// Default upstream provider base URL.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Upstream provider credential.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Upstream provider settings.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Base URL endpoints are appended to.
    pub base_url: String,
    /// Request timeout (`None` = no explicit deadline).
    pub timeout: Option<Duration>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Freshness window for cached responses.
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// Server port settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// API server port.
    pub http_port: u16,
    /// Health check HTTP port.
    pub health_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_port: 3000,
            health_port: 8082,
        }
    }
}

/// Complete proxy configuration.
///
/// A missing credential is not a startup error: every proxy request answers
/// with a configuration error until one is provided.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Upstream credential, if configured.
    pub credentials: Option<Credentials>,
    /// Upstream provider settings.
    pub upstream: UpstreamSettings,
    /// Response cache settings.
    pub cache: CacheSettings,
    /// Server port settings.
    pub server: ServerSettings,
}

impl ProxyConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a provided value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = std::env::var("FINNHUB_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(Credentials::new);

        let base_url = std::env::var("MARKET_DATA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string());
        validate_base_url(&base_url)?;

        let timeout_secs = parse_env("IPO_PROXY_UPSTREAM_TIMEOUT_SECS", 0_u64)?;
        let upstream = UpstreamSettings {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        };

        let ttl_secs = parse_env("IPO_PROXY_CACHE_TTL_SECS", DEFAULT_CACHE_TTL.as_secs())?;
        if ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "IPO_PROXY_CACHE_TTL_SECS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        let cache = CacheSettings {
            ttl: Duration::from_secs(ttl_secs),
        };

        let defaults = ServerSettings::default();
        let server = ServerSettings {
            http_port: parse_env("IPO_PROXY_HTTP_PORT", defaults.http_port)?,
            health_port: parse_env("IPO_PROXY_HEALTH_PORT", defaults.health_port)?,
        };

        Ok(Self {
            credentials,
            upstream,
            cache,
            server,
        })
    }

    /// The configured API key, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.credentials.as_ref().map(|c| c.api_key().to_string())
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: "MARKET_DATA_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got {url:?}"),
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has an unusable value.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// What was wrong.
        reason: String,
    },
}

fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, std::env::var(key).ok().as_deref(), default)
}

/// Unset or blank falls back to `default`; anything else must parse.
fn parse_value<T>(key: &str, raw: Option<&str>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("{value:?} is not a valid number: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_redacted_debug() {
        let creds = Credentials::new("key123".to_string());
        let debug = format!("{creds:?}");
        assert!(!debug.contains("key123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn base_url_validation() {
        assert!(validate_base_url("https://finnhub.io/api/v1").is_ok());
        assert!(validate_base_url("http://127.0.0.1:9000").is_ok());
        assert!(validate_base_url("finnhub.io").is_err());
    }

    #[test]
    fn upstream_settings_defaults() {
        let settings = UpstreamSettings::default();
        assert_eq!(settings.base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert!(settings.timeout.is_none());
    }

    #[test]
    fn cache_settings_defaults() {
        assert_eq!(CacheSettings::default().ttl, Duration::from_secs(3600));
    }

    #[test]
    fn unset_or_blank_value_uses_default() {
        assert_eq!(parse_value("IPO_PROXY_CACHE_TTL_SECS", None, 3600_u64).unwrap(), 3600);
        assert_eq!(parse_value("IPO_PROXY_HTTP_PORT", Some("  "), 3000_u16).unwrap(), 3000);
        assert_eq!(parse_value("IPO_PROXY_HTTP_PORT", Some(" 8080 "), 3000_u16).unwrap(), 8080);
    }

    #[test]
    fn malformed_ttl_is_rejected() {
        let err = parse_value("IPO_PROXY_CACHE_TTL_SECS", Some("1h"), 3600_u64).unwrap_err();
        let ConfigError::InvalidValue { key, reason } = err;
        assert_eq!(key, "IPO_PROXY_CACHE_TTL_SECS");
        assert!(reason.contains("1h"));
    }

    #[test]
    fn malformed_port_is_rejected() {
        assert!(matches!(
            parse_value("IPO_PROXY_HTTP_PORT", Some("30o0"), 3000_u16),
            Err(ConfigError::InvalidValue { .. })
        ));
        // Out of range for u16
        assert!(matches!(
            parse_value("IPO_PROXY_HEALTH_PORT", Some("70000"), 8082_u16),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn server_settings_defaults() {
        let settings = ServerSettings::default();
        assert_eq!(settings.http_port, 3000);
        assert_eq!(settings.health_port, 8082);
    }
}
