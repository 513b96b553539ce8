//! Language-model provider abstraction for the extraction fallback.
//!
//! A trait-based abstraction over chat-completion providers, with a real
//! OpenAI-compatible client and a deterministic fake for tests. Providers
//! are constructor-injected into the pipeline, never module globals.

mod extractor;
mod fake;
mod openai;

pub use extractor::{clean_page_text, extract_with_llm, SYSTEM_PROMPT};
pub use fake::FakeProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for language-model operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for chat-completion providers.
///
/// Implementations should be stateless and thread-safe.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send one chat completion (system + user message) and return the
    /// model's text reply.
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, LlmError>;

    /// Provider name (e.g., "openai", "fake").
    fn provider_name(&self) -> &'static str;

    /// Model name (e.g., "gpt-4").
    fn model_name(&self) -> &str;
}

/// Build a provider from environment variables.
///
/// - `EXTRACTION_PROVIDER`: "openai" | "fake" (default "fake")
/// - `OPENAI_API_KEY`: API key for the openai provider
/// - `OPENAI_MODEL`: model name (default "gpt-4")
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, LlmError> {
    let provider = std::env::var("EXTRACTION_PROVIDER").unwrap_or_else(|_| "fake".to_string());

    match provider.as_str() {
        "fake" => Ok(Box::new(FakeProvider::default())),
        "openai" => {
            let api_key = std::env::var("OPENAI_API_KEY")
                .map_err(|_| LlmError::NotConfigured("OPENAI_API_KEY not set".to_string()))?;
            let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
            Ok(Box::new(OpenAiProvider::new(api_key, model)))
        }
        other => Err(LlmError::NotConfigured(format!(
            "Unknown provider: {}",
            other
        ))),
    }
}
