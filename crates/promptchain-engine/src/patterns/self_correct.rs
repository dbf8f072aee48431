//! Self-correct: execute the output, and on failure fix it exactly once
//!
//! One generation round produces a shell command; an executor probe
//! attempts it. On failure a single corrective round embeds the original
//! command and the failure detail, and the corrected command is attempted
//! once more. The chain never issues a third attempt: a correction that
//! still fails is a failure outcome.

use async_trait::async_trait;
use tracing::info;

use super::{ChainPattern, PatternId};
use crate::attempts::BoundedAttempts;
use crate::context::ChainContext;
use crate::outcome::{Artifact, ChainOutcome};
use crate::probe::Probe;
use promptchain_extraction::Payload;
use promptchain_utils::error::ChainError;

/// Default goal of the generated command.
const DEFAULT_GOAL: &str = "list all files in the current directory";

/// Both the initial try and the single correction.
const MAX_ATTEMPTS: usize = 2;

/// Self-correction pattern.
pub struct SelfCorrect {
    goal: String,
    executor: Box<dyn Probe>,
}

impl SelfCorrect {
    #[must_use]
    pub fn new(executor: Box<dyn Probe>) -> Self {
        Self {
            goal: DEFAULT_GOAL.to_string(),
            executor,
        }
    }

    #[must_use]
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }
}

#[async_trait]
impl ChainPattern for SelfCorrect {
    fn id(&self) -> PatternId {
        PatternId::SelfCorrect
    }

    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError> {
        let goal = &self.goal;
        let mut attempts = BoundedAttempts::new(MAX_ATTEMPTS);
        let mut last_failed: Option<String> = None;

        // The attempt budget bounds the loop: one initial round, one
        // corrective round, never a third
        while attempts.begin().is_some() {
            let command = match &last_failed {
                None => {
                    let command = ctx
                        .generate(format!(
                            "Generate a bash command that enables us to {goal}. \
                             Respond with only the command."
                        ))
                        .await?;
                    info!(command = %command, "Initial command generated");
                    command
                }
                Some(failed) => {
                    let failure_detail = "command failed to execute properly";
                    let reply = ctx
                        .generate(format!(
                            "The following bash command was generated to {goal}, but \
                             encountered an error when run:\n\nCommand: {failed}\n\
                             Error: {failure_detail}\n\n\
                             Please provide an updated bash command that will successfully \
                             {goal}. Respond with only the updated command in JSON format \
                             {{\"command\": \"<command>\"}}"
                        ))
                        .await?;

                    let corrected = Payload::parse(&reply)?.str_field("command")?.to_string();
                    info!(command = %corrected, "Corrected command generated");
                    corrected
                }
            };

            if self.executor.probe(&command).await {
                info!("Command executed successfully");
                return Ok(ChainOutcome::success(Artifact::new(
                    "self_correct_command.txt",
                    command,
                )));
            }

            info!(command = %command, "Execution failed");
            last_failed = Some(command);
        }

        Ok(ChainOutcome::failure(format!(
            "corrected command still failed after {} attempts: {}",
            attempts.made(),
            last_failed.unwrap_or_default(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ScriptedProbe;
    use crate::testing::QueueBackend;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_initial_success_needs_one_round() {
        let backend = Arc::new(QueueBackend::new(&["ls -la"]));
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));
        let mut pattern = SelfCorrect::new(Box::new(ScriptedProbe::new(&[true])));

        let outcome = pattern.run(&ctx).await.unwrap();
        assert_eq!(backend.calls(), 1);
        assert_eq!(pattern.executor.invocations(), 1);
        match outcome {
            ChainOutcome::Success { artifact, .. } => assert_eq!(artifact.text, "ls -la"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_triggers_exactly_one_correction() {
        let backend = Arc::new(QueueBackend::new(&[
            "ls",
            r#"{"command": "ls -la"}"#,
        ]));
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));
        let mut pattern = SelfCorrect::new(Box::new(ScriptedProbe::new(&[false, true])));

        let outcome = pattern.run(&ctx).await.unwrap();
        // Two generation rounds, two executions, never three
        assert_eq!(backend.calls(), 2);
        assert_eq!(pattern.executor.invocations(), 2);
        assert!(backend.prompt(1).contains("Command: ls"));
        match outcome {
            ChainOutcome::Success { artifact, .. } => assert_eq!(artifact.text, "ls -la"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_correction_is_failure_not_third_attempt() {
        let backend = Arc::new(QueueBackend::new(&[
            "ls",
            r#"{"command": "ls -la"}"#,
        ]));
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));
        let mut pattern = SelfCorrect::new(Box::new(ScriptedProbe::new(&[false, false])));

        let outcome = pattern.run(&ctx).await.unwrap();
        assert_eq!(backend.calls(), 2);
        assert_eq!(pattern.executor.invocations(), 2);
        match outcome {
            ChainOutcome::Failure { diagnostic } => {
                // The attempt budget, not control flow, ended the loop
                assert!(diagnostic.contains("2 attempts"));
                assert!(diagnostic.contains("ls -la"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_correction_halts_chain() {
        let backend = Arc::new(QueueBackend::new(&["ls", "just run ls -la"]));
        let ctx = ChainContext::new(backend, Duration::from_secs(5));
        let mut pattern = SelfCorrect::new(Box::new(ScriptedProbe::new(&[false])));

        let err = pattern.run(&ctx).await.unwrap_err();
        assert!(matches!(err, ChainError::Parse(_)));
        // The unparsed correction is never executed
        assert_eq!(pattern.executor.invocations(), 1);
    }
}
