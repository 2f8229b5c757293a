//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults point at the public demo APIs.
//!
//! - `SHOPSTORE_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPSTORE_PORT` - Listen port (default: 3000)
//! - `SHOPSTORE_STATE_DIR` - Directory for persisted session state
//!   (default: .shopstore-state)
//! - `CATALOG_API_URL` - Product catalog base URL
//!   (default: <https://fakestoreapi.com>)
//! - `AUTH_BACKEND` - `directory` or `token` (default: directory)
//! - `AUTH_API_URL` - Auth backend base URL (default depends on backend)
//! - `DIRECTORY_SHARED_PASSWORD` - Shared password for the directory
//!   backend (default: the demo directory's published password)
//! - `TAX_RATE` - Decimal tax rate applied to cart totals (default: 0.08)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default catalog API (fakestore-shaped).
const DEFAULT_CATALOG_API_URL: &str = "https://fakestoreapi.com";
/// Default directory API (jsonplaceholder-shaped).
const DEFAULT_DIRECTORY_API_URL: &str = "https://jsonplaceholder.typicode.com";
/// The token-issuing backend lives on the catalog API host.
const DEFAULT_TOKEN_API_URL: &str = "https://fakestoreapi.com";
/// Published password shared by every demo directory user.
const DEFAULT_DIRECTORY_PASSWORD: &str = "plutonic123";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Directory for persisted session state (token + profile).
    pub state_dir: PathBuf,
    /// Product catalog API base URL.
    pub catalog_api_url: String,
    /// Which auth backend is active and how to reach it.
    pub auth: AuthBackendConfig,
    /// Tax rate applied to cart totals (e.g. 0.08).
    pub tax_rate: Decimal,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

/// Auth backend selection.
///
/// The two observed backend shapes are modeled as a tagged union resolved by
/// configuration, never by sniffing response payloads at runtime.
///
/// Implements `Debug` manually to redact the shared password.
#[derive(Clone)]
pub enum AuthBackendConfig {
    /// `POST {base}/auth/login` issues a token; profile fetched separately.
    TokenIssuing {
        base_url: String,
    },
    /// `GET {base}/users` directory matched client-side by username/email
    /// against a single shared password.
    Directory {
        base_url: String,
        shared_password: SecretString,
    },
}

impl AuthBackendConfig {
    /// Base URL of the active backend.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match self {
            Self::TokenIssuing { base_url } | Self::Directory { base_url, .. } => base_url,
        }
    }
}

impl std::fmt::Debug for AuthBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenIssuing { base_url } => f
                .debug_struct("TokenIssuing")
                .field("base_url", base_url)
                .finish(),
            Self::Directory { base_url, .. } => f
                .debug_struct("Directory")
                .field("base_url", base_url)
                .field("shared_password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_host(&get_env_or_default("SHOPSTORE_HOST", "127.0.0.1"))?;
        let port = parse_port(&get_env_or_default("SHOPSTORE_PORT", "3000"))?;
        let state_dir = PathBuf::from(get_env_or_default("SHOPSTORE_STATE_DIR", ".shopstore-state"));

        let catalog_api_url = parse_base_url(
            "CATALOG_API_URL",
            &get_env_or_default("CATALOG_API_URL", DEFAULT_CATALOG_API_URL),
        )?;
        let auth = parse_auth_backend(
            &get_env_or_default("AUTH_BACKEND", "directory"),
            get_optional_env("AUTH_API_URL"),
            SecretString::from(get_env_or_default(
                "DIRECTORY_SHARED_PASSWORD",
                DEFAULT_DIRECTORY_PASSWORD,
            )),
        )?;
        let tax_rate = parse_tax_rate(&get_env_or_default("TAX_RATE", "0.08"))?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            state_dir,
            catalog_api_url,
            auth,
            tax_rate,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Value parsing
// =============================================================================
//
// All validation is on plain values so it can be tested without touching the
// process environment; `from_env` only does the env reads.

fn parse_host(value: &str) -> Result<IpAddr, ConfigError> {
    value
        .parse::<IpAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPSTORE_HOST".to_string(), e.to_string()))
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPSTORE_PORT".to_string(), e.to_string()))
}

/// Parse a tax rate; negative rates are rejected.
fn parse_tax_rate(value: &str) -> Result<Decimal, ConfigError> {
    let rate = value
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar("TAX_RATE".to_string(), e.to_string()))?;
    if rate < Decimal::ZERO {
        return Err(ConfigError::InvalidEnvVar(
            "TAX_RATE".to_string(),
            "must be non-negative".to_string(),
        ));
    }
    Ok(rate)
}

/// Validate that `value` parses as an absolute URL and trim a trailing slash.
fn parse_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value.trim_end_matches('/').to_string())
}

/// Resolve the auth backend selection. `explicit_url` overrides the
/// per-backend default base URL.
fn parse_auth_backend(
    backend: &str,
    explicit_url: Option<String>,
    shared_password: SecretString,
) -> Result<AuthBackendConfig, ConfigError> {
    match backend {
        "directory" => {
            let base_url = parse_base_url(
                "AUTH_API_URL",
                explicit_url.as_deref().unwrap_or(DEFAULT_DIRECTORY_API_URL),
            )?;
            Ok(AuthBackendConfig::Directory {
                base_url,
                shared_password,
            })
        }
        "token" => {
            let base_url = parse_base_url(
                "AUTH_API_URL",
                explicit_url.as_deref().unwrap_or(DEFAULT_TOKEN_API_URL),
            )?;
            Ok(AuthBackendConfig::TokenIssuing { base_url })
        }
        other => Err(ConfigError::InvalidEnvVar(
            "AUTH_BACKEND".to_string(),
            format!("expected 'directory' or 'token', got '{other}'"),
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
