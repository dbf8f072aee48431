//! Chain pattern implementations
//!
//! One module per orchestration strategy. A pattern is a pure procedure
//! over the chain context: it builds prompts from fixed template text plus
//! prior results, interprets structured replies, and halts in success
//! (with an artifact) or failure (with a diagnostic).

mod branch;
mod fallback;
mod fanout;
mod human;
mod linear;
mod plan;
mod self_correct;

pub use branch::ConditionalBranch;
pub use fallback::{CascadeEntry, FallbackCascade};
pub use fanout::FanOutFanIn;
pub use human::HumanLoop;
pub use linear::Linear;
pub use plan::PlanExecute;
pub use self_correct::SelfCorrect;

use async_trait::async_trait;

use crate::context::ChainContext;
use crate::outcome::ChainOutcome;
use promptchain_utils::error::ChainError;

/// Identifier for a chain pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternId {
    /// Progressive refinement over sequential rounds
    Linear,
    /// Plan once, delegate sub-tasks to worker rounds
    FanOutFanIn,
    /// Try candidates in order until an evaluator accepts one
    FallbackCascade,
    /// Classify, then follow the selected branch
    ConditionalBranch,
    /// Plan round followed by an execution round
    PlanExecute,
    /// Iterate with operator feedback until the sentinel
    HumanLoop,
    /// Execute, and on failure issue one corrective round
    SelfCorrect,
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::FanOutFanIn => "workers",
            Self::FallbackCascade => "fallback",
            Self::ConditionalBranch => "decision",
            Self::PlanExecute => "plan",
            Self::HumanLoop => "human",
            Self::SelfCorrect => "self-correct",
        };
        write!(f, "{name}")
    }
}

/// One orchestration strategy over the generation backend.
///
/// `run` consumes zero or more generation rounds and terminates in a
/// `ChainOutcome`. Fatal conditions (backend failure, a chain-fatal parse
/// failure, cancellation) surface as `ChainError`; evaluator rejection and
/// other defined failure paths are normal `Failure` outcomes.
#[async_trait]
pub trait ChainPattern: Send {
    /// Which pattern this is.
    fn id(&self) -> PatternId;

    /// Run the chain to a terminal state.
    async fn run(&mut self, ctx: &ChainContext) -> Result<ChainOutcome, ChainError>;
}
