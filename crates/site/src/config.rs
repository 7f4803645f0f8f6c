//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_BASE_URL` - Public URL for the site (an `https://` URL enables
//!   `Secure` session cookies)
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `CMS_API_URL` - Base URL of the CMS API (default: <http://localhost:4000>)
//! - `CMS_TIMEOUT_SECS` - CMS request timeout (default: 10)
//! - `SECTIONS_CACHE_TTL_SECS` - How long the public section list is cached (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default CMS API location.
pub const DEFAULT_CMS_API_URL: &str = "http://localhost:4000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// CMS API configuration
    pub cms: CmsConfig,
    /// TTL of the cached public section list
    pub sections_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// CMS API configuration.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// Base URL, without the `/api` suffix
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("SITE_HOST", "127.0.0.1")?;
        let port = parse_env("SITE_PORT", "3000")?;
        let base_url = get_required_env("SITE_BASE_URL")?;
        let cms = CmsConfig::from_env()?;
        let sections_cache_ttl = Duration::from_secs(parse_env("SECTIONS_CACHE_TTL_SECS", "60")?);

        Ok(Self {
            host,
            port,
            base_url,
            cms,
            sections_cache_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Configuration with defaults for everything but the two URLs.
    #[must_use]
    pub fn new(base_url: impl Into<String>, cms_api_url: Url) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: base_url.into(),
            cms: CmsConfig {
                api_url: cms_api_url,
                timeout: Duration::from_secs(10),
            },
            sections_cache_ttl: Duration::from_secs(60),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CmsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("CMS_API_URL", DEFAULT_CMS_API_URL);
        let api_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("CMS_API_URL".to_string(), e.to_string()))?;
        let timeout = Duration::from_secs(parse_env("CMS_TIMEOUT_SECS", "10")?);
        Ok(Self { api_url, timeout })
    }

    /// Origin of the CMS (scheme, host and port), used for image URLs and
    /// the CSP `img-src` directive.
    #[must_use]
    pub fn origin(&self) -> String {
        self.api_url.origin().ascii_serialization()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SiteConfig {
        SiteConfig::new(base_url, Url::parse("http://cms.internal:4000").unwrap())
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        assert!(config("https://voltagenerators.com").secure_cookies());
        assert!(!config("http://localhost:3000").secure_cookies());
    }

    #[test]
    fn test_cms_origin() {
        assert_eq!(config("http://x").cms.origin(), "http://cms.internal:4000");
    }

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("SITE_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);

        let err = parse_value::<u16>("SITE_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SITE_PORT"));

        let rate: f32 = parse_value("SENTRY_SAMPLE_RATE", "0.25").unwrap();
        assert!((rate - 0.25).abs() < f32::EPSILON);
    }
}
