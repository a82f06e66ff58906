//! Bridge configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BRIDGE_DATABASE_URL` - `PostgreSQL` connection string
//! - `SURECART_API_KEY` - SureCart API token (read access to store data)
//! - `OMNISEND_API_KEY` - Omnisend private API key
//!
//! ## Optional
//! - `BRIDGE_HOST` - Bind address (default: 127.0.0.1)
//! - `BRIDGE_PORT` - Listen port (default: 3002)
//! - `SURECART_API_URL` - API base URL (default: <https://api.surecart.com/v1>)
//! - `OMNISEND_API_URL` - API base URL (default: <https://api.omnisend.com/v3>)
//! - `BRIDGE_SYNC_INTERVAL_SECS` - Backfill scheduler tick (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_SURECART_API_URL: &str = "https://api.surecart.com/v1";
const DEFAULT_OMNISEND_API_URL: &str = "https://api.omnisend.com/v3";
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Bridge application configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SureCart API configuration
    pub surecart: SureCartConfig,
    /// Omnisend API configuration
    pub omnisend: OmnisendConfig,
    /// Seconds between backfill scheduler ticks
    pub sync_interval_secs: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// SureCart API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct SureCartConfig {
    /// API base URL (overridable for testing)
    pub api_url: String,
    /// API token
    pub api_key: SecretString,
}

impl std::fmt::Debug for SureCartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SureCartConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Omnisend API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OmnisendConfig {
    /// API base URL (overridable for testing)
    pub api_url: String,
    /// Private API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for OmnisendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmnisendConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("BRIDGE_DATABASE_URL")?.into();

        let host = optional("BRIDGE_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse()
            .map_err(|e| invalid("BRIDGE_HOST", &e))?;

        let port = optional("BRIDGE_PORT")
            .unwrap_or_else(|| "3002".to_owned())
            .parse()
            .map_err(|e| invalid("BRIDGE_PORT", &e))?;

        let surecart = SureCartConfig {
            api_url: optional("SURECART_API_URL")
                .unwrap_or_else(|| DEFAULT_SURECART_API_URL.to_owned()),
            api_key: require("SURECART_API_KEY")?.into(),
        };

        let omnisend = OmnisendConfig {
            api_url: optional("OMNISEND_API_URL")
                .unwrap_or_else(|| DEFAULT_OMNISEND_API_URL.to_owned()),
            api_key: require("OMNISEND_API_KEY")?.into(),
        };

        let sync_interval_secs = match optional("BRIDGE_SYNC_INTERVAL_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|e| invalid("BRIDGE_SYNC_INTERVAL_SECS", &e))?,
            None => DEFAULT_SYNC_INTERVAL_SECS,
        };

        let sentry_sample_rate = match optional("SENTRY_SAMPLE_RATE") {
            Some(raw) => raw.parse().map_err(|e| invalid("SENTRY_SAMPLE_RATE", &e))?,
            None => 1.0,
        };

        let sentry_traces_sample_rate = match optional("SENTRY_TRACES_SAMPLE_RATE") {
            Some(raw) => raw
                .parse()
                .map_err(|e| invalid("SENTRY_TRACES_SAMPLE_RATE", &e))?,
            None => 0.0,
        };

        Ok(Self {
            database_url,
            host,
            port,
            surecart,
            omnisend,
            sync_interval_secs,
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn invalid(name: &str, err: &dyn std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(name.to_owned(), err.to_string())
}
