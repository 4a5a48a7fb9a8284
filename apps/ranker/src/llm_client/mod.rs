/// LLM Client — the single point of entry for all model calls in the ranker.
///
/// ARCHITECTURAL RULE: No other module may call a model provider directly.
/// All LLM interactions go through a `TextGenerator`.
///
/// Each call is a single attempt. There is no retry and no client-side timeout:
/// callers await one outcome, success or a single `LlmError`.
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::LlmProvider;

pub mod anthropic;
pub mod gemini;
pub mod prompts;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Port over an external text-generation model.
///
/// Implemented by the provider clients below; tests substitute a scripted stand-in.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one prompt and returns the model's free-text reply.
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Error body shared by both providers: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Turns a non-success response into `LlmError::Api`, preferring the provider's own message.
async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Builds the generator for the configured provider.
pub fn build_generator(provider: LlmProvider, api_key: String) -> Arc<dyn TextGenerator> {
    match provider {
        LlmProvider::Anthropic => Arc::new(AnthropicClient::new(api_key)),
        LlmProvider::Gemini => Arc::new(GeminiClient::new(api_key)),
    }
}
