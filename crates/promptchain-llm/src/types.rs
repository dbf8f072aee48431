//! Core types for the generation backend abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use promptchain_utils::error::BackendError;

/// Input to one generation call: a prompt plus invocation parameters.
///
/// Prompts are immutable once built; patterns assemble them from fixed
/// template text and prior round results.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full prompt text for this round
    pub prompt: String,
    /// Model override; empty string uses the backend default
    pub model: String,
    /// Timeout for this invocation
    pub timeout: Duration,
    /// Provider-specific parameters (e.g., temperature, max_tokens)
    pub metadata: HashMap<String, serde_json::Value>,
}

impl GenerationRequest {
    /// Create a request with the backend's default model.
    #[must_use]
    pub fn new(prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            prompt: prompt.into(),
            model: String::new(),
            timeout,
            metadata: HashMap::new(),
        }
    }

    /// Set an explicit model for this request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Add a provider-specific parameter.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Result of one generation call.
///
/// Ephemeral: owned by the calling chain step and discarded once its text
/// has been extracted or parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Raw response text from the backend
    pub text: String,
    /// Provider name (e.g., "anthropic", "gemini")
    pub provider: String,
    /// Model that was actually used
    pub model_used: String,
    /// Input tokens consumed (if reported)
    pub tokens_input: Option<u64>,
    /// Output tokens generated (if reported)
    pub tokens_output: Option<u64>,
}

impl GenerationResponse {
    /// Create a new response.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        provider: impl Into<String>,
        model_used: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            model_used: model_used.into(),
            tokens_input: None,
            tokens_output: None,
        }
    }

    /// Set token counts.
    #[must_use]
    pub fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.tokens_input = Some(input);
        self.tokens_output = Some(output);
        self
    }
}

/// Trait for generation backend implementations.
///
/// The sole point of contact with any text-generation capability. One
/// implementation per backend family, selected once at startup; chain
/// patterns never branch on the concrete provider. Backends do not retry —
/// retry and fallback are pattern-level decisions.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send a prompt and return the completion.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` for any failure: transport problems,
    /// provider auth/quota/outage responses, or timeouts.
    async fn generate(&self, req: GenerationRequest) -> Result<GenerationResponse, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_construction() {
        let req = GenerationRequest::new("say hello", Duration::from_secs(30));
        assert_eq!(req.prompt, "say hello");
        assert!(req.model.is_empty());
        assert!(req.metadata.is_empty());
    }

    #[test]
    fn test_request_builders() {
        let req = GenerationRequest::new("prompt", Duration::from_secs(30))
            .with_model("claude-3-5-haiku-latest")
            .with_metadata("temperature", serde_json::json!(0.7));

        assert_eq!(req.model, "claude-3-5-haiku-latest");
        assert_eq!(
            req.metadata.get("temperature").unwrap(),
            &serde_json::json!(0.7)
        );
    }

    #[test]
    fn test_response_construction() {
        let resp =
            GenerationResponse::new("hello", "anthropic", "claude-3-5-haiku-latest")
                .with_tokens(10, 5);

        assert_eq!(resp.text, "hello");
        assert_eq!(resp.provider, "anthropic");
        assert_eq!(resp.tokens_input, Some(10));
        assert_eq!(resp.tokens_output, Some(5));
    }

    #[test]
    fn test_response_serialization_round_trip() {
        let resp = GenerationResponse::new("text", "gemini", "gemini-2.0-flash-exp");
        let json = serde_json::to_string(&resp).unwrap();
        let back: GenerationResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, "text");
        assert_eq!(back.provider, "gemini");
        assert_eq!(back.tokens_input, None);
    }
}
