//! Chain orchestration engine for promptchain
//!
//! Seven patterns for composing generation calls into multi-step
//! workflows. Each pattern drives rounds of (build prompt → call backend →
//! extract → parse → decide), then hands its final artifact to a sink.
//! Patterns own their run-local state; nothing is shared across chain
//! invocations.

pub mod attempts;
pub mod context;
pub mod input;
pub mod outcome;
pub mod patterns;
pub mod probe;
pub mod sink;

pub use attempts::BoundedAttempts;
pub use context::ChainContext;
pub use input::{InputSource, ScriptedSource, StdinSource};
pub use outcome::{Artifact, ChainOutcome};
pub use patterns::{
    CascadeEntry, ChainPattern, ConditionalBranch, FallbackCascade, FanOutFanIn, HumanLoop, Linear,
    PatternId, PlanExecute, SelfCorrect,
};
pub use probe::{CoinFlipProbe, Probe, ScriptedProbe};
pub use sink::{ArtifactSink, FileSink, MemorySink};
