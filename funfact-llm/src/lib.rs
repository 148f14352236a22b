//! Daily Fun Fact LLM
//!
//! [`funfact_core::TextGenerator`] implementation backed by Mistral's
//! chat-completions API. The HTTP client speaks the OpenAI-compatible wire
//! format, so `MISTRAL_BASE_URL` can point at any compatible endpoint.

pub mod providers;

pub use providers::mistral::{MistralClient, MistralConfig, MistralGenerator};
