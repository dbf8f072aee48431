//! Anthropic HTTP backend
//!
//! Generation backend speaking Anthropic's Messages API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_client::HttpClient;
use crate::types::{GenerationBackend, GenerationRequest, GenerationResponse};
use promptchain_config::Config;
use promptchain_utils::error::BackendError;

/// Default Anthropic API endpoint
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model when the config names none
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Request parameters resolvable per invocation.
#[derive(Debug, Clone)]
struct HttpParams {
    max_tokens: u32,
    temperature: f32,
}

impl Default for HttpParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.2,
        }
    }
}

/// Anthropic Messages API backend.
#[derive(Clone)]
pub struct AnthropicBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    default_model: String,
    default_params: HttpParams,
}

impl AnthropicBackend {
    /// Create a backend from configuration.
    ///
    /// The API key is read once from the environment variable named by
    /// `[llm.anthropic] api_key_env` (default `ANTHROPIC_API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Misconfiguration` if the key variable is not
    /// set or the HTTP client cannot be constructed.
    pub fn new_from_config(config: &Config) -> Result<Self, BackendError> {
        let section = config.llm.anthropic.as_ref();

        let api_key_env = section
            .and_then(|a| a.api_key_env.as_deref())
            .unwrap_or("ANTHROPIC_API_KEY");

        let api_key = std::env::var(api_key_env).map_err(|_| {
            BackendError::Misconfiguration(format!(
                "Anthropic API key not found in environment variable '{api_key_env}'. \
                 Set this variable or configure api_key_env in [llm.anthropic]."
            ))
        })?;

        let default_params = HttpParams {
            max_tokens: section.and_then(|a| a.max_tokens).unwrap_or(2048),
            temperature: section.and_then(|a| a.temperature).unwrap_or(0.2),
        };

        Ok(Self {
            client: HttpClient::new()?,
            base_url: section
                .and_then(|a| a.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            default_model: section
                .and_then(|a| a.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            default_params,
        })
    }

    /// Resolve model and parameters for this invocation.
    ///
    /// `req.model` overrides the default model; `req.metadata` entries
    /// `max_tokens` and `temperature` override the config defaults.
    fn resolve_params(&self, req: &GenerationRequest) -> (String, HttpParams) {
        let model = if req.model.is_empty() {
            self.default_model.clone()
        } else {
            req.model.clone()
        };

        let max_tokens = req
            .metadata
            .get("max_tokens")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
            .unwrap_or(self.default_params.max_tokens);

        let temperature = req
            .metadata
            .get("temperature")
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
            .unwrap_or(self.default_params.temperature);

        (
            model,
            HttpParams {
                max_tokens,
                temperature,
            },
        )
    }
}

#[async_trait]
impl GenerationBackend for AnthropicBackend {
    async fn generate(&self, req: GenerationRequest) -> Result<GenerationResponse, BackendError> {
        let (model, params) = self.resolve_params(&req);

        debug!(
            provider = "anthropic",
            model = %model,
            max_tokens = params.max_tokens,
            temperature = params.temperature,
            "Invoking Anthropic backend"
        );

        let request_body = AnthropicRequest {
            model: model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: req.prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let request = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body);

        let response = self
            .client
            .execute(request, req.timeout, "anthropic")
            .await?;

        let response_body: AnthropicResponse = response.json().await.map_err(|e| {
            BackendError::Transport(format!("Failed to parse Anthropic response: {e}"))
        })?;

        let text: String = response_body
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(BackendError::Transport(
                "Anthropic response missing text content".to_string(),
            ));
        }

        let mut result = GenerationResponse::new(text, "anthropic", model);
        if let Some(usage) = response_body.usage {
            result = result.with_tokens(usage.input_tokens, usage.output_tokens);
        }

        debug!(
            provider = "anthropic",
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            "Anthropic invocation completed"
        );

        Ok(result)
    }
}

/// Anthropic Messages API request body
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// A message in Anthropic's API format
#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

/// Anthropic Messages API response body
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    usage: Option<AnthropicUsage>,
}

/// A content block in the response
#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

/// Token usage reported by the API
#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}
