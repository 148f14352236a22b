//! Mistral text generator

use super::client::MistralClient;
use super::config::MistralConfig;
use super::types::{CompletionRequest, CompletionResponse, Message};
use super::PROVIDER;
use crate::providers::invalid_response;
use async_trait::async_trait;
use funfact_core::{FunFactResult, GenerationOptions, LlmError, TextGenerator};

/// [`TextGenerator`] that sends the prompt as a single user message and
/// returns the first choice's content.
#[derive(Debug, Clone)]
pub struct MistralGenerator {
    client: MistralClient,
    options: GenerationOptions,
}

impl MistralGenerator {
    pub fn new(client: MistralClient, options: GenerationOptions) -> Self {
        Self { client, options }
    }

    pub fn from_config(config: MistralConfig) -> Self {
        let client = MistralClient::new(config.api_key).with_base_url(config.base_url);
        Self::new(client, config.options)
    }

    pub fn is_configured(&self) -> bool {
        self.client.has_api_key()
    }
}

#[async_trait]
impl TextGenerator for MistralGenerator {
    async fn generate_with(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> FunFactResult<String> {
        if !self.is_configured() {
            return Err(LlmError::ProviderNotConfigured.into());
        }

        let request = CompletionRequest {
            model: options.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response: CompletionResponse = self.client.request("chat/completions", &request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| invalid_response(PROVIDER, "No completion in response"))?;

        tracing::debug!(
            model = %options.model,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = response.usage.as_ref().and_then(|u| u.completion_tokens),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "Mistral completion"
        );

        choice
            .message
            .content
            .ok_or_else(|| invalid_response(PROVIDER, "Completion has no content"))
    }

    fn default_options(&self) -> GenerationOptions {
        self.options.clone()
    }
}
