//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target a local json-server backend.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STORE_API_URL` - REST backend holding products and the cart (default: <http://localhost:3001>)
//! - `STORE_API_TIMEOUT_SECS` - Backend request timeout (default: none)
//! - `STORE_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL, 0 disables (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default REST backend (json-server's default port).
pub const DEFAULT_STORE_API_URL: &str = "http://localhost:3001";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// REST backend configuration
    pub store: StoreApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
}

/// REST backend (catalog and cart store) configuration.
#[derive(Debug, Clone)]
pub struct StoreApiConfig {
    /// Base URL; resources live at `{base_url}/products` and `{base_url}/cart`
    pub base_url: Url,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// How long catalog responses are cached. `None` disables caching.
    pub catalog_cache_ttl: Option<Duration>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        Ok(Self {
            host,
            port,
            base_url,
            store: StoreApiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl StoreApiConfig {
    /// Backend config with no timeout and no catalog cache.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("STORE_API_URL", base_url)?,
            timeout: None,
            catalog_cache_ttl: None,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("STORE_API_URL", DEFAULT_STORE_API_URL);
        let timeout = get_optional_env("STORE_API_TIMEOUT_SECS")
            .map(|v| parse_seconds("STORE_API_TIMEOUT_SECS", &v))
            .transpose()?
            .flatten();
        let catalog_cache_ttl = parse_seconds(
            "STORE_CATALOG_CACHE_TTL_SECS",
            &get_env_or_default("STORE_CATALOG_CACHE_TTL_SECS", "0"),
        )?;

        Ok(Self {
            base_url: parse_base_url("STORE_API_URL", &base_url)?,
            timeout,
            catalog_cache_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a backend base URL. Only http and https are accepted.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be an absolute URL with a host".to_string(),
        ));
    }
    Ok(url)
}

/// Parse a whole number of seconds. Zero means "disabled".
fn parse_seconds(var_name: &str, value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
