//! Text generation provider implementations

pub mod mistral;

pub use mistral::{MistralClient, MistralConfig, MistralGenerator};

use funfact_core::{FunFactError, LlmError};

pub(crate) fn request_failed(provider: &str, status: i32, message: impl Into<String>) -> FunFactError {
    LlmError::RequestFailed {
        provider: provider.to_string(),
        status,
        message: message.into(),
    }
    .into()
}

pub(crate) fn rate_limited(provider: &str, retry_after_ms: i64) -> FunFactError {
    LlmError::RateLimited {
        provider: provider.to_string(),
        retry_after_ms,
    }
    .into()
}

pub(crate) fn invalid_response(provider: &str, reason: impl Into<String>) -> FunFactError {
    LlmError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.into(),
    }
    .into()
}
