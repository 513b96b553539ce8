//! Fake language-model provider for testing.
//!
//! Returns deterministic responses based on prompt matching, so tests run
//! without network access. Tracks how many completions were requested,
//! which lets tests assert that a strategy was (or was not) invoked.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// A fake provider matching registered substrings against the user content.
#[derive(Debug)]
pub struct FakeProvider {
    /// Map of content substring -> response
    responses: RwLock<HashMap<String, String>>,
    /// Default response if no match found
    default_response: Option<String>,
    calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: Some("{}".to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a FakeProvider that returns a response when the user content
    /// contains a substring.
    pub fn with_response(content_contains: &str, response: &str) -> Self {
        let mut provider = Self::new();
        provider.add_response(content_contains, response);
        provider
    }

    /// Add a response for content containing a specific substring.
    pub fn add_response(&mut self, content_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap()
            .insert(content_contains.to_string(), response.to_string());
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, _system_prompt: &str, user_content: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let responses = self.responses.read().unwrap();

        let content_lower = user_content.to_lowercase();
        for (pattern, response) in responses.iter() {
            if content_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for content (first 100 chars): {}",
                &user_content[..user_content.len().min(100)]
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_provider_matching() {
        let provider = FakeProvider::with_response("carbonara", "{\"title\": \"Carbonara\"}");
        let result = provider
            .complete("system", "a page about carbonara")
            .await
            .unwrap();
        assert_eq!(result, "{\"title\": \"Carbonara\"}");
    }

    #[tokio::test]
    async fn test_fake_provider_case_insensitive() {
        let provider = FakeProvider::with_response("CARBONARA", "matched");
        let result = provider.complete("system", "carbonara page").await.unwrap();
        assert_eq!(result, "matched");
    }

    #[tokio::test]
    async fn test_fake_provider_no_match() {
        let provider = FakeProvider::new();
        let result = provider.complete("system", "random content").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fake_provider_counts_calls() {
        let provider = FakeProvider::new().with_default_response("{}");
        assert_eq!(provider.call_count(), 0);
        provider.complete("system", "one").await.unwrap();
        provider.complete("system", "two").await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }
}
