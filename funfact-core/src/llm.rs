//! Text generation capability.
//!
//! Provider implementations live in funfact-llm.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::FunFactResult;

/// Per-request generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Provider model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on completion tokens
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "mistral-tiny".to_string(),
            temperature: 1.0,
            max_tokens: 4096,
        }
    }
}

/// Opaque prompt-to-text backend.
///
/// Errors are returned as-is to the caller; implementations own any
/// retry policy they want, the service adds none.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a single completion for `prompt` with explicit options.
    async fn generate_with(&self, prompt: &str, options: &GenerationOptions)
        -> FunFactResult<String>;

    /// Options used by [`TextGenerator::generate`].
    fn default_options(&self) -> GenerationOptions {
        GenerationOptions::default()
    }

    /// Generate a single completion for `prompt` with the default options.
    async fn generate(&self, prompt: &str) -> FunFactResult<String> {
        let options = self.default_options();
        self.generate_with(prompt, &options).await
    }
}
