//! API Configuration Module
//!
//! Bind address, CORS and backend selection, loaded from environment
//! variables with development defaults.

use std::net::SocketAddr;
use std::str::FromStr;

use funfact_core::{env_parse, ConfigError};

/// Which store and lock implementation the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// Shared Redis; safe across processes
    #[default]
    Redis,
    /// Process-local; development only
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue {
                field: "FUNFACT_STORE".to_string(),
                value: other.to_string(),
                reason: "expected 'redis' or 'memory'".to_string(),
            }),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Interface to bind.
    pub bind_host: String,

    /// Port to bind.
    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    pub store: StoreKind,

    pub redis_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            cors_max_age_secs: 86400,
            store: StoreKind::default(),
            redis_url: "redis://localhost:6379".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `FUNFACT_API_BIND`: interface (default: 0.0.0.0)
    /// - `PORT` or `FUNFACT_API_PORT`: port (default: 8000)
    /// - `FUNFACT_CORS_ORIGINS`: comma-separated origins (empty = allow all)
    /// - `FUNFACT_CORS_MAX_AGE_SECS`: preflight cache duration (default: 86400)
    /// - `FUNFACT_STORE`: "redis" or "memory" (default: redis)
    /// - `REDIS_URL`: Redis connection URL (default: redis://localhost:6379)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(_) => env_parse("PORT", defaults.port)?,
            Err(_) => env_parse("FUNFACT_API_PORT", defaults.port)?,
        };

        let cors_origins = std::env::var("FUNFACT_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        Ok(Self {
            bind_host: std::env::var("FUNFACT_API_BIND").unwrap_or(defaults.bind_host),
            port,
            cors_origins,
            cors_max_age_secs: env_parse("FUNFACT_CORS_MAX_AGE_SECS", defaults.cors_max_age_secs)?,
            store: env_parse("FUNFACT_STORE", defaults.store)?,
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
        })
    }

    /// Socket address built from host and port.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            field: "FUNFACT_API_BIND".to_string(),
            value: addr.clone(),
            reason: e.to_string(),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
