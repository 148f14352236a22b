//! Service configuration

use std::str::FromStr;
use std::time::Duration;

use crate::{ConfigError, DayBoundary, DEFAULT_LOCK_TTL, DEFAULT_RECENT_LIMIT};

/// Tunables for [`crate::FactService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Lifetime of a day's generation lock.
    pub lock_ttl: Duration,
    /// Number of recent facts used for the prompt exclusion list.
    pub recent_limit: usize,
    /// Timezone that decides the current day.
    pub day_boundary: DayBoundary,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            lock_ttl: DEFAULT_LOCK_TTL,
            recent_limit: DEFAULT_RECENT_LIMIT,
            day_boundary: DayBoundary::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from environment variables.
    ///
    /// - `FUNFACT_LOCK_TTL_SECS`: lock lifetime in seconds (default: 10)
    /// - `FUNFACT_RECENT_LIMIT`: prompt history size (default: 10)
    /// - `FUNFACT_DAY_BOUNDARY`: "local" or "utc" (default: local)
    pub fn from_env() -> Result<Self, ConfigError> {
        let lock_ttl_secs: u64 = env_parse("FUNFACT_LOCK_TTL_SECS", DEFAULT_LOCK_TTL.as_secs())?;
        if lock_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "FUNFACT_LOCK_TTL_SECS".to_string(),
                value: "0".to_string(),
                reason: "lock TTL must be at least one second".to_string(),
            });
        }

        Ok(Self {
            lock_ttl: Duration::from_secs(lock_ttl_secs),
            recent_limit: env_parse("FUNFACT_RECENT_LIMIT", DEFAULT_RECENT_LIMIT)?,
            day_boundary: match std::env::var("FUNFACT_DAY_BOUNDARY") {
                Ok(value) => value.parse()?,
                Err(_) => DayBoundary::default(),
            },
        })
    }
}

/// Parse an environment variable, falling back to `default` when unset.
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
