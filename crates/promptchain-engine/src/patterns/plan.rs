//! Plan-then-execute: separate the planning round from the execution round
//!
//! The plan is free text forwarded opaquely into the execution prompt — no
//! validation between the rounds. The execution round's result is the
//! artifact.

use async_trait::async_trait;
use tracing::info;

use super::{ChainPattern, PatternId};
use crate::context::ChainContext;
use crate::outcome::{Artifact, ChainOutcome};
use promptchain_utils::error::ChainError;

/// Default task planned and executed by the chain.
const DEFAULT_TASK: &str = "Design the software architecture for an AI assistant that uses tts, \
     llms, local sqlite.";

/// Plan/execute pattern.
pub struct PlanExecute {
    task: String,
}

impl PlanExecute {
    #[must_use]
    pub fn new() -> Self {
        Self::with_task(DEFAULT_TASK)
    }

    #[must_use]
    pub fn with_task(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}

impl Default for PlanExecute {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainPattern for PlanExecute {
    fn id(&self) -> PatternId {
        PatternId::PlanExecute
    }

    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError> {
        let task = &self.task;

        let plan = ctx
            .generate(format!(
                "Let's think step by step about how we would accomplish this task: '{task}'. \
                 Write all the steps, ideas, variables, mermaid diagrams, use cases, and \
                 examples concisely in markdown format."
            ))
            .await?;
        info!(plan_len = plan.len(), "Plan round complete");

        let document = ctx
            .generate(format!(
                "Create a detailed architecture document on how to execute this task '{task}' \
                 given this detailed plan:\n\n{plan}"
            ))
            .await?;
        info!(document_len = document.len(), "Execution round complete");

        Ok(ChainOutcome::success(Artifact::new(
            "plan_execute.md",
            document,
        )))
    }
}
