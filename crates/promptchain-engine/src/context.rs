//! Per-run chain context
//!
//! Owns the collaborators one chain invocation needs: the generation
//! backend, the invocation timeout, and a cooperative cancellation flag
//! checked before every generation call. Exclusively owned by one running
//! chain; never shared across invocations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

use promptchain_extraction::strip_fences;
use promptchain_llm::{GenerationBackend, GenerationRequest};
use promptchain_utils::error::ChainError;

/// Context for one chain run.
pub struct ChainContext {
    backend: Arc<dyn GenerationBackend>,
    timeout: Duration,
    cancel: Arc<AtomicBool>,
}

impl ChainContext {
    /// Create a context around a backend.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share the cancellation flag (e.g., with a Ctrl-C handler). Setting
    /// it stops the chain before its next generation call.
    #[must_use]
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run one generation round: check cancellation, call the backend,
    /// extract the reply text.
    ///
    /// # Errors
    ///
    /// `ChainError::Cancelled` when the flag is set, otherwise any
    /// `BackendError` from the call. No retry here.
    pub async fn generate(&self, prompt: impl Into<String>) -> Result<String, ChainError> {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(ChainError::Cancelled);
        }

        let prompt = prompt.into();
        debug!(prompt_len = prompt.len(), "Generation round");

        let response = self
            .backend
            .generate(GenerationRequest::new(prompt, self.timeout))
            .await?;

        Ok(strip_fences(&response.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use promptchain_llm::GenerationResponse;
    use promptchain_utils::error::BackendError;

    struct EchoBackend;

    #[async_trait]
    impl GenerationBackend for EchoBackend {
        async fn generate(
            &self,
            req: GenerationRequest,
        ) -> Result<GenerationResponse, BackendError> {
            Ok(GenerationResponse::new(
                format!("```json\n{}\n```", req.prompt),
                "mock",
                "mock-model",
            ))
        }
    }

    #[tokio::test]
    async fn test_generate_extracts_reply() {
        let ctx = ChainContext::new(Arc::new(EchoBackend), Duration::from_secs(5));
        let text = ctx.generate("{\"a\": 1}").await.unwrap();
        assert_eq!(text, "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_cancellation_checked_before_call() {
        let ctx = ChainContext::new(Arc::new(EchoBackend), Duration::from_secs(5));
        ctx.cancellation_flag().store(true, Ordering::SeqCst);

        let err = ctx.generate("prompt").await.unwrap_err();
        assert!(matches!(err, ChainError::Cancelled));
    }
}
