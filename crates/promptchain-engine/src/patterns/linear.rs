//! Progressive refinement: each round builds on the previous round's text
//!
//! Four sequential rounds grow a topic into a finished blog post: title,
//! outline, section content, markdown assembly. Each prompt embeds the
//! previous round's raw extracted text; the rounds do not require the
//! intermediate JSON to parse, so a sloppy reply still feeds the next
//! round. Halts only on a backend failure.

use async_trait::async_trait;
use tracing::info;

use super::{ChainPattern, PatternId};
use crate::context::ChainContext;
use crate::outcome::{Artifact, ChainOutcome};
use promptchain_utils::error::ChainError;

/// Default topic refined by the chain.
const DEFAULT_TOPIC: &str = "3 Unusual Use Cases for LLMs";

/// Progressive refinement pattern.
pub struct Linear {
    topic: String,
}

impl Linear {
    #[must_use]
    pub fn new() -> Self {
        Self::with_topic(DEFAULT_TOPIC)
    }

    #[must_use]
    pub fn with_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

impl Default for Linear {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainPattern for Linear {
    fn id(&self) -> PatternId {
        PatternId::Linear
    }

    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError> {
        let topic = &self.topic;

        let title = ctx
            .generate(format!(
                "Generate a clickworthy title about this topic: '{topic}'. \
                 Respond in JSON format {{\"title\": \"<title>\", \"topic\": \"{topic}\"}}"
            ))
            .await?;
        info!(round = 1, "Title round complete");

        let outline = ctx
            .generate(format!(
                "Generate a compelling 3 section outline given this information: {title}. \
                 Respond in JSON format {{\"title\": \"<title>\", \"topic\": \"<topic>\", \
                 \"sections\": [\"<section1>\", \"<section2>\", \"<section3>\"]}}"
            ))
            .await?;
        info!(round = 2, "Outline round complete");

        let content = ctx
            .generate(format!(
                "Generate 1 paragraph of content for each section outline given this \
                 information: {outline}. Respond in JSON format {{\"title\": \"<title>\", \
                 \"topic\": \"<topic>\", \"sections\": [\"<section1>\", \"<section2>\", \
                 \"<section3>\"], \"content\": [\"<content1>\", \"<content2>\", \"<content3>\"]}}"
            ))
            .await?;
        info!(round = 3, "Content round complete");

        let blog = ctx
            .generate(format!(
                "Generate a markdown formatted blog post given this information: {content}. \
                 Respond in JSON format {{\"markdown_blog\": \"<entire markdown blog post>\"}}"
            ))
            .await?;
        info!(round = 4, "Markdown round complete");

        Ok(ChainOutcome::success(Artifact::new(
            "linear_chain.md",
            blog,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingBackend, QueueBackend};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_four_rounds_thread_previous_text() {
        let backend = Arc::new(QueueBackend::new(&[
            r#"{"title": "T1", "topic": "llms"}"#,
            r#"{"title": "T1", "sections": ["a", "b", "c"]}"#,
            r#"{"title": "T1", "content": ["p1", "p2", "p3"]}"#,
            "# Final blog",
        ]));
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));

        let outcome = Linear::new().run(&ctx).await.unwrap();

        assert_eq!(backend.calls(), 4);
        // Each later prompt embeds the previous round's extracted text
        assert!(backend.prompt(1).contains(r#"{"title": "T1", "topic": "llms"}"#));
        assert!(backend.prompt(2).contains(r#""sections": ["a", "b", "c"]"#));
        assert!(backend.prompt(3).contains(r#""content": ["p1", "p2", "p3"]"#));

        match outcome {
            ChainOutcome::Success { artifact, warnings } => {
                assert_eq!(artifact.name, "linear_chain.md");
                assert_eq!(artifact.text, "# Final blog");
                assert!(warnings.is_empty());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_intermediate_text_still_threads() {
        // Rounds forward raw extracted text, parsed or not
        let backend = Arc::new(QueueBackend::new(&[
            "not json at all",
            "also prose",
            "more prose",
            "final",
        ]));
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));

        let outcome = Linear::new().run(&ctx).await.unwrap();
        assert!(backend.prompt(1).contains("not json at all"));
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_backend_failure_halts_chain() {
        let ctx = ChainContext::new(Arc::new(FailingBackend), Duration::from_secs(5));
        let err = Linear::new().run(&ctx).await.unwrap_err();
        assert!(matches!(err, ChainError::Backend(_)));
    }
}
