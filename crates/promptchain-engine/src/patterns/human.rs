//! Human-in-the-loop: iterate on a result with operator feedback
//!
//! A seed round produces an initial result; the loop then blocks on one
//! line of external input per iteration. Non-sentinel input is appended,
//! together with the prior result, to a growing prompt and the backend is
//! invoked again. The sentinel (or end of input) terminates the loop with
//! the last result as the artifact. Unbounded: no iteration cap, no
//! timeout.

use async_trait::async_trait;
use tracing::info;

use super::{ChainPattern, PatternId};
use crate::context::ChainContext;
use crate::input::InputSource;
use crate::outcome::{Artifact, ChainOutcome};
use promptchain_utils::error::ChainError;

/// Default topic seeding the loop.
const DEFAULT_TOPIC: &str = "Personal AI Assistants";

/// Interactive refinement pattern.
pub struct HumanLoop {
    topic: String,
    sentinel: String,
    input: Box<dyn InputSource>,
}

impl HumanLoop {
    #[must_use]
    pub fn new(sentinel: impl Into<String>, input: Box<dyn InputSource>) -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            sentinel: sentinel.into(),
            input,
        }
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }
}

#[async_trait]
impl ChainPattern for HumanLoop {
    fn id(&self) -> PatternId {
        PatternId::HumanLoop
    }

    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError> {
        let topic = &self.topic;
        let mut prompt = format!("Generate 5 ideas surrounding this topic: '{topic}'");
        let mut result = ctx.generate(prompt.clone()).await?;
        println!("{result}");

        let read_prompt = format!(
            "Iterate on result or type '{}' to finish: ",
            self.sentinel
        );

        let mut iterations = 0usize;
        loop {
            // Suspension point: blocks until the operator responds
            let feedback = match self.input.read_line(&read_prompt)? {
                Some(line) => line,
                // End of input ends the loop like the sentinel
                None => break,
            };

            if feedback.eq_ignore_ascii_case(&self.sentinel) {
                break;
            }

            prompt.push_str(&format!(
                "\n\n----------------\n\nPrevious result: {result}\n\n----------------\n\n\
                 Iterate on the previous result and generate 5 more ideas based on this \
                 feedback: {feedback}"
            ));
            result = ctx.generate(prompt.clone()).await?;
            println!("{result}\n\n----------------\n");
            iterations += 1;
        }

        info!(iterations, "Human loop finished");
        Ok(ChainOutcome::success(Artifact::new(
            "human_loop.md",
            result,
        )))
    }
}
