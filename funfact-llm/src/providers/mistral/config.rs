//! Mistral provider configuration

use super::client::DEFAULT_BASE_URL;
use funfact_core::{env_parse, ConfigError, GenerationOptions};

/// Connection settings and default generation options.
#[derive(Clone, PartialEq)]
pub struct MistralConfig {
    /// Bearer token. Empty means "not configured".
    pub api_key: String,
    /// API root, without trailing slash.
    pub base_url: String,
    pub options: GenerationOptions,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            options: GenerationOptions::default(),
        }
    }
}

impl MistralConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load from environment variables.
    ///
    /// - `MISTRAL_API_KEY`: bearer token (default: empty)
    /// - `MISTRAL_BASE_URL`: API root (default: https://api.mistral.ai/v1)
    /// - `MISTRAL_MODEL`: model id (default: mistral-tiny)
    /// - `MISTRAL_TEMPERATURE`: sampling temperature (default: 1.0)
    /// - `MISTRAL_MAX_TOKENS`: completion token cap (default: 4096)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = GenerationOptions::default();
        let temperature: f32 = env_parse("MISTRAL_TEMPERATURE", defaults.temperature)?;
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "MISTRAL_TEMPERATURE".to_string(),
                value: temperature.to_string(),
                reason: "temperature must be a non-negative number".to_string(),
            });
        }

        Ok(Self {
            api_key: std::env::var("MISTRAL_API_KEY").unwrap_or_default(),
            base_url: std::env::var("MISTRAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            options: GenerationOptions {
                model: std::env::var("MISTRAL_MODEL").unwrap_or(defaults.model),
                temperature,
                max_tokens: env_parse("MISTRAL_MAX_TOKENS", defaults.max_tokens)?,
            },
        })
    }
}

impl std::fmt::Debug for MistralConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "[REDACTED]" })
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}
