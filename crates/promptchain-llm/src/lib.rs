//! Generation backend abstraction for promptchain
//!
//! Trait-based access to text-generation providers. All providers implement
//! the `GenerationBackend` trait, so chain patterns work with any provider
//! without knowing implementation details. The provider is chosen once at
//! startup from configuration, never per call.

mod anthropic;
mod gemini;
pub(crate) mod http_client;
mod types;

pub use types::{GenerationBackend, GenerationRequest, GenerationResponse};

pub use anthropic::AnthropicBackend;
pub use gemini::GeminiBackend;

use promptchain_config::Config;
use promptchain_utils::error::BackendError;

/// Construct the backend named by the configuration.
///
/// # Errors
///
/// Returns `BackendError::Unsupported` for an unknown provider name and
/// `BackendError::Misconfiguration` when provider setup fails (e.g., a
/// missing API key variable).
pub fn backend_from_config(config: &Config) -> Result<Box<dyn GenerationBackend>, BackendError> {
    match config.provider() {
        "anthropic" => Ok(Box::new(AnthropicBackend::new_from_config(config)?)),
        "gemini" => Ok(Box::new(GeminiBackend::new_from_config(config)?)),
        other => Err(BackendError::Unsupported(format!(
            "Unknown provider '{other}', expected 'anthropic' or 'gemini'"
        ))),
    }
}
