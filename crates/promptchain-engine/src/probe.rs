//! Evaluator/executor probes
//!
//! A probe is an external boolean-valued check, distinct from the
//! generation backend: "does this candidate actually work". The cascade
//! pattern uses one as an evaluator, the self-correct pattern as an
//! executor. The production stand-in flips a coin; tests inject scripted
//! sequences so no test depends on randomness.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// External boolean-valued check on a candidate artifact.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Attempt/evaluate the candidate; true means it works.
    async fn probe(&self, candidate: &str) -> bool;

    /// Number of times this probe has been invoked.
    fn invocations(&self) -> usize;
}

/// Stand-in probe with a 50% success rate.
///
/// Placeholder for a real validation step (compiling the generated code,
/// running the generated command); the contract is any boolean probe.
#[derive(Default)]
pub struct CoinFlipProbe {
    count: AtomicUsize,
}

impl CoinFlipProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Probe for CoinFlipProbe {
    async fn probe(&self, candidate: &str) -> bool {
        self.count.fetch_add(1, Ordering::SeqCst);
        let success = rand::thread_rng().gen_bool(0.5);
        debug!(
            success,
            candidate_len = candidate.len(),
            "Coin-flip probe evaluated candidate"
        );
        success
    }

    fn invocations(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Probe returning a fixed sequence of outcomes, for tests.
///
/// Once the script is exhausted every further call returns the last
/// scripted value (or false for an empty script).
pub struct ScriptedProbe {
    script: Mutex<Vec<bool>>,
    count: AtomicUsize,
}

impl ScriptedProbe {
    #[must_use]
    pub fn new(outcomes: &[bool]) -> Self {
        let mut script: Vec<bool> = outcomes.to_vec();
        script.reverse();
        Self {
            script: Mutex::new(script),
            count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self, _candidate: &str) -> bool {
        self.count.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().expect("probe script lock poisoned");
        match script.len() {
            0 => false,
            1 => script[0],
            _ => script.pop().unwrap_or(false),
        }
    }

    fn invocations(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}
