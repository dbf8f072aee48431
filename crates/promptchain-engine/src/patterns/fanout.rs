//! Fan-out/fan-in: plan sub-tasks, delegate each to a worker round
//!
//! One planning round yields a list of function stubs; each stub gets its
//! own implementation round, and the parsed implementations are joined
//! into one combined artifact in submission order. A sub-task whose reply
//! fails to parse is skipped with a recorded diagnostic; a planning-round
//! parse failure is chain-fatal. The worker rounds are sequential here but
//! have no ordering dependency between them.

use async_trait::async_trait;
use tracing::{info, warn};

use super::{ChainPattern, PatternId};
use crate::context::ChainContext;
use crate::outcome::{Artifact, ChainOutcome};
use promptchain_extraction::Payload;
use promptchain_utils::error::ChainError;

/// Planning prompt: stubs for three structured-file writers.
const PLAN_PROMPT: &str = r#"Create the function stubs for three functions:
1. write_json_file(file_path: str, data: dict) -> None
2. write_yml_file(file_path: str, data: dict) -> None
3. write_toml_file(file_path: str, data: dict) -> None

Include detailed docstrings with Args, Returns, Raises, and Usage examples.
Respond in JSON format {"function_stubs": ["def function1...", "def function2...", "def function3..."]}"#;

/// Delegation pattern.
#[derive(Default)]
pub struct FanOutFanIn;

impl FanOutFanIn {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChainPattern for FanOutFanIn {
    fn id(&self) -> PatternId {
        PatternId::FanOutFanIn
    }

    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError> {
        let plan_text = ctx.generate(PLAN_PROMPT).await?;

        // The plan must parse; without it there is nothing to delegate
        let stubs = Payload::parse(&plan_text)?.str_list_field("function_stubs")?;
        info!(sub_tasks = stubs.len(), "Plan round complete");

        let mut implementations = Vec::new();
        let mut warnings = Vec::new();

        for (index, stub) in stubs.iter().enumerate() {
            let number = index + 1;
            info!(sub_task = number, total = stubs.len(), "Implementing sub-task");

            let reply = ctx
                .generate(format!(
                    "Implement this function stub with proper error handling and imports:\n\n\
                     {stub}\n\n\
                     Respond in JSON format {{\"code\": \"<implementation>\"}}"
                ))
                .await?;

            // Sub-task parse failures are locally recoverable: skip and go on
            match Payload::parse(&reply).and_then(|p| p.str_field("code").map(String::from)) {
                Ok(code) => implementations.push(code),
                Err(e) => {
                    let diagnostic = format!("sub-task {number} skipped: {e}");
                    warn!(sub_task = number, error = %e, "Skipping unparseable sub-task result");
                    warnings.push(diagnostic);
                }
            }
        }

        if implementations.is_empty() {
            return Ok(ChainOutcome::failure(format!(
                "no sub-task produced a usable implementation ({} attempted)",
                stubs.len()
            )));
        }

        Ok(ChainOutcome::Success {
            artifact: Artifact::new("worker_functions.py", implementations.join("\n\n")),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::QueueBackend;
    use std::sync::Arc;
    use std::time::Duration;

    const PLAN: &str =
        r#"{"function_stubs": ["def write_json...", "def write_yml...", "def write_toml..."]}"#;

    #[tokio::test]
    async fn test_all_sub_tasks_combined_in_order() {
        let backend = Arc::new(QueueBackend::new(&[
            PLAN,
            r#"{"code": "def write_json_file(p, d): ..."}"#,
            r#"{"code": "def write_yml_file(p, d): ..."}"#,
            r#"{"code": "def write_toml_file(p, d): ..."}"#,
        ]));
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));

        let outcome = FanOutFanIn::new().run(&ctx).await.unwrap();
        assert_eq!(backend.calls(), 4);

        match outcome {
            ChainOutcome::Success { artifact, warnings } => {
                assert_eq!(artifact.name, "worker_functions.py");
                assert_eq!(
                    artifact.text,
                    "def write_json_file(p, d): ...\n\ndef write_yml_file(p, d): ...\n\ndef write_toml_file(p, d): ..."
                );
                assert!(warnings.is_empty());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_sub_task_skipped_with_diagnostic() {
        let backend = Arc::new(QueueBackend::new(&[
            PLAN,
            r#"{"code": "impl one"}"#,
            "this is not json",
            r#"{"code": "impl three"}"#,
        ]));
        let ctx = ChainContext::new(backend, Duration::from_secs(5));

        let outcome = FanOutFanIn::new().run(&ctx).await.unwrap();
        match outcome {
            ChainOutcome::Success { artifact, warnings } => {
                assert_eq!(artifact.text, "impl one\n\nimpl three");
                assert_eq!(warnings.len(), 1);
                assert!(warnings[0].contains("sub-task 2 skipped"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plan_parse_failure_is_chain_fatal() {
        let backend = Arc::new(QueueBackend::new(&["no stubs here"]));
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));

        let err = FanOutFanIn::new().run(&ctx).await.unwrap_err();
        assert!(matches!(err, ChainError::Parse(_)));
        // No worker round runs after a failed plan
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_sub_tasks_failing_is_failure_outcome() {
        let backend = Arc::new(QueueBackend::new(&[
            r#"{"function_stubs": ["stub one", "stub two"]}"#,
            "garbage",
            "more garbage",
        ]));
        let ctx = ChainContext::new(backend, Duration::from_secs(5));

        let outcome = FanOutFanIn::new().run(&ctx).await.unwrap();
        match outcome {
            ChainOutcome::Failure { diagnostic } => {
                assert!(diagnostic.contains("2 attempted"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
