//! Gemini HTTP backend
//!
//! Generation backend speaking the Gemini `generateContent` API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_client::HttpClient;
use crate::types::{GenerationBackend, GenerationRequest, GenerationResponse};
use promptchain_config::Config;
use promptchain_utils::error::BackendError;

/// Default Gemini API base URL; the model name and key are appended per call
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model when the config names none
const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Gemini generateContent backend.
#[derive(Clone)]
pub struct GeminiBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    default_model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiBackend {
    /// Create a backend from configuration.
    ///
    /// The API key is read once from the environment variable named by
    /// `[llm.gemini] api_key_env` (default `GEMINI_API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Misconfiguration` if the key variable is not
    /// set or the HTTP client cannot be constructed.
    pub fn new_from_config(config: &Config) -> Result<Self, BackendError> {
        let section = config.llm.gemini.as_ref();

        let api_key_env = section
            .and_then(|g| g.api_key_env.as_deref())
            .unwrap_or("GEMINI_API_KEY");

        let api_key = std::env::var(api_key_env).map_err(|_| {
            BackendError::Misconfiguration(format!(
                "Gemini API key not found in environment variable '{api_key_env}'. \
                 Set this variable or configure api_key_env in [llm.gemini]."
            ))
        })?;

        Ok(Self {
            client: HttpClient::new()?,
            base_url: section
                .and_then(|g| g.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            default_model: section
                .and_then(|g| g.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: section.and_then(|g| g.temperature).unwrap_or(0.2),
            max_output_tokens: section.and_then(|g| g.max_tokens).unwrap_or(2048),
        })
    }

    fn resolve_model(&self, req: &GenerationRequest) -> String {
        if req.model.is_empty() {
            self.default_model.clone()
        } else {
            req.model.clone()
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, req: GenerationRequest) -> Result<GenerationResponse, BackendError> {
        let model = self.resolve_model(&req);

        debug!(
            provider = "gemini",
            model = %model,
            temperature = self.temperature,
            "Invoking Gemini backend"
        );

        let url = format!("{}/{}:generateContent", self.base_url, model);

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: req.prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body);

        let response = self.client.execute(request, req.timeout, "gemini").await?;

        let response_body: GeminiResponse = response.json().await.map_err(|e| {
            BackendError::Transport(format!("Failed to parse Gemini response: {e}"))
        })?;

        let text: String = response_body
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BackendError::Transport(
                "Gemini response missing text content".to_string(),
            ));
        }

        let mut result = GenerationResponse::new(text, "gemini", model);
        if let Some(usage) = response_body.usage_metadata {
            result = result.with_tokens(usage.prompt_token_count, usage.candidates_token_count);
        }

        Ok(result)
    }
}

/// Gemini generateContent request body
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Gemini generateContent response body
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_backend() -> GeminiBackend {
        GeminiBackend {
            client: HttpClient::new().unwrap(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: "test-key".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_output_tokens: 2048,
        }
    }

    #[test]
    fn test_resolve_model_default() {
        let backend = test_backend();
        let req = GenerationRequest::new("prompt", Duration::from_secs(30));
        assert_eq!(backend.resolve_model(&req), DEFAULT_MODEL);
    }

    #[test]
    fn test_resolve_model_override() {
        let backend = test_backend();
        let req =
            GenerationRequest::new("prompt", Duration::from_secs(30)).with_model("gemini-1.5-pro");
        assert_eq!(backend.resolve_model(&req), "gemini-1.5-pro");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello from Gemini"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 8, "candidatesTokenCount": 5}
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(
            response.candidates[0].content.parts[0].text,
            "Hello from Gemini"
        );
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 8);
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }
}
