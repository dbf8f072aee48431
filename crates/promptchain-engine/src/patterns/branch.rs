//! Conditional branch: a classification round selects the downstream chain
//!
//! One round classifies a piece of market commentary as positive or
//! negative sentiment; the label picks which report branch runs next. The
//! label must parse and must be in the allowed set — anything else halts
//! the chain with a parse error.

use async_trait::async_trait;
use tracing::info;

use super::{ChainPattern, PatternId};
use crate::context::ChainContext;
use crate::outcome::{Artifact, ChainOutcome};
use promptchain_extraction::Payload;
use promptchain_utils::error::ChainError;

/// Default text classified by the chain.
const DEFAULT_FEED: &str = "The competitive landscape remains challenging, with some competitors \
     engaging in aggressive pricing strategies.";

/// Allowed sentiment labels.
const LABELS: [&str; 2] = ["positive", "negative"];

/// Decision pattern.
pub struct ConditionalBranch {
    feed: String,
}

impl ConditionalBranch {
    #[must_use]
    pub fn new() -> Self {
        Self::with_feed(DEFAULT_FEED)
    }

    #[must_use]
    pub fn with_feed(feed: impl Into<String>) -> Self {
        Self { feed: feed.into() }
    }
}

impl Default for ConditionalBranch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainPattern for ConditionalBranch {
    fn id(&self) -> PatternId {
        PatternId::ConditionalBranch
    }

    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError> {
        let feed = &self.feed;

        let reply = ctx
            .generate(format!(
                "Analyze the sentiment of the following text as either positive or negative: \
                 '{feed}'. Respond in JSON format {{\"sentiment\": \"positive\" | \"negative\"}}"
            ))
            .await?;

        let sentiment = Payload::parse(&reply)?.label_field("sentiment", &LABELS)?;
        info!(sentiment = %sentiment, "Classification round complete");

        let report = match sentiment.as_str() {
            "negative" => {
                info!("Negative sentiment detected, generating risk report");
                ctx.generate(format!(
                    "Write a concise risk report for this statement: '{feed}'. \
                     Cover the main threats it implies and one mitigation for each."
                ))
                .await?
            }
            _ => {
                info!("Positive sentiment detected, generating opportunity report");
                ctx.generate(format!(
                    "Write a concise opportunity report for this statement: '{feed}'. \
                     Cover the main openings it implies and how to act on each."
                ))
                .await?
            }
        };

        Ok(ChainOutcome::success(Artifact::new(
            "decision_report.md",
            report,
        )))
    }
}
