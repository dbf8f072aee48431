//! Fallback cascade: try candidates in order until one is accepted
//!
//! An ordered list of entries, each invoking the backend and then an
//! evaluator probe on the result. The first accepted result terminates the
//! cascade; if every entry is rejected the chain halts in failure — a
//! normal, reported outcome. Cost and speed labels are descriptive only
//! and never used for selection.

use async_trait::async_trait;
use tracing::info;

use super::{ChainPattern, PatternId};
use crate::attempts::BoundedAttempts;
use crate::context::ChainContext;
use crate::outcome::{Artifact, ChainOutcome};
use crate::probe::Probe;
use promptchain_utils::error::ChainError;

/// Generation prompt tried by every cascade entry.
const GENERATION_PROMPT: &str = "Generate the solution in python given this function definition: \
     'def text_to_speech(text) -> Bytes'. \
     Respond in JSON format {\"python_code\": \"<python code>\"}";

/// One cascade candidate. Cost and speed are display metadata.
#[derive(Debug, Clone)]
pub struct CascadeEntry {
    pub label: String,
    pub cost: String,
    pub speed: String,
}

impl CascadeEntry {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        cost: impl Into<String>,
        speed: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            cost: cost.into(),
            speed: speed.into(),
        }
    }
}

/// Cost-based fallback pattern.
pub struct FallbackCascade {
    entries: Vec<CascadeEntry>,
    evaluator: Box<dyn Probe>,
}

impl FallbackCascade {
    /// Cascade over the default cheap-to-expensive entries.
    #[must_use]
    pub fn new(evaluator: Box<dyn Probe>) -> Self {
        Self::with_entries(
            vec![
                CascadeEntry::new("Claude 3 Haiku", "Low ($)", "Fast (0.5s)"),
                CascadeEntry::new("Claude 3 Sonnet", "Medium ($$)", "Medium (1s)"),
                CascadeEntry::new("Claude 3 Opus", "High ($$$)", "Slow (2s)"),
            ],
            evaluator,
        )
    }

    #[must_use]
    pub fn with_entries(entries: Vec<CascadeEntry>, evaluator: Box<dyn Probe>) -> Self {
        Self { entries, evaluator }
    }
}

#[async_trait]
impl ChainPattern for FallbackCascade {
    fn id(&self) -> PatternId {
        PatternId::FallbackCascade
    }

    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError> {
        let mut attempts = BoundedAttempts::new(self.entries.len());

        while let Some(index) = attempts.begin() {
            let entry = &self.entries[index];
            info!(
                candidate = %entry.label,
                cost = %entry.cost,
                speed = %entry.speed,
                attempt = index + 1,
                "Trying cascade candidate"
            );

            let candidate = ctx.generate(GENERATION_PROMPT).await?;

            if self.evaluator.probe(&candidate).await {
                info!(candidate = %entry.label, "Cascade candidate accepted");
                return Ok(ChainOutcome::success(Artifact::new(
                    "fallback_solution.py",
                    candidate,
                )));
            }
            info!(candidate = %entry.label, "Cascade candidate rejected, falling back");
        }

        Ok(ChainOutcome::failure(format!(
            "all {} cascade candidates were rejected by the evaluator",
            attempts.made()
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

    fn backend(n: usize) -> Arc<QueueBackend> {
        let responses: Vec<String> = (0..n).map(|i| format!("candidate {i}")).collect();
        let refs: Vec<&str> = responses.iter().map(String::as_str).collect();
        Arc::new(QueueBackend::new(&refs))
    }

    #[tokio::test]
    async fn test_first_accepted_candidate_terminates_cascade() {
        let backend = backend(3);
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));
        let mut cascade = FallbackCascade::new(Box::new(ScriptedProbe::new(&[true])));

        let outcome = cascade.run(&ctx).await.unwrap();
        assert_eq!(backend.calls(), 1);
        match outcome {
            ChainOutcome::Success { artifact, .. } => {
                assert_eq!(artifact.name, "fallback_solution.py");
                assert_eq!(artifact.text, "candidate 0");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failures_fall_through_in_order() {
        // First two rejected, third accepted: exactly three invocations
        let backend = backend(3);
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));
        let evaluator = ScriptedProbe::new(&[false, false, true]);
        let mut cascade = FallbackCascade::new(Box::new(evaluator));

        let outcome = cascade.run(&ctx).await.unwrap();
        assert_eq!(backend.calls(), 3);
        match outcome {
            ChainOutcome::Success { artifact, .. } => assert_eq!(artifact.text, "candidate 2"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_all_rejected_is_failure_with_no_artifact() {
        let backend = backend(3);
        let ctx = ChainContext::new(backend.clone(), Duration::from_secs(5));
        let evaluator = ScriptedProbe::new(&[false, false, false]);
        let mut cascade = FallbackCascade::new(Box::new(evaluator));

        let outcome = cascade.run(&ctx).await.unwrap();
        // Every entry invoked exactly once
        assert_eq!(backend.calls(), 3);
        match outcome {
            ChainOutcome::Failure { diagnostic } => {
                assert!(diagnostic.contains("all 3 cascade candidates"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_evaluator_invoked_once_per_candidate() {
        let backend = backend(2);
        let ctx = ChainContext::new(backend, Duration::from_secs(5));
        let mut cascade = FallbackCascade::with_entries(
            vec![
                CascadeEntry::new("first", "$", "fast"),
                CascadeEntry::new("second", "$$", "slow"),
            ],
            Box::new(ScriptedProbe::new(&[false, false])),
        );

        let outcome = cascade.run(&ctx).await.unwrap();
        assert!(!outcome.is_success());
        assert_eq!(cascade.evaluator.invocations(), 2);
    }
}
