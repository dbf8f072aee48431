//! promptchain - chain pattern runner for LLM workflow experiments
//!
//! An experimentation harness demonstrating distinct patterns for composing
//! calls to a text-generation backend into multi-step workflows: progressive
//! refinement, worker delegation, cost-based fallback, conditional
//! branching, plan-then-execute, human-in-the-loop iteration, and
//! self-correction.

pub mod cli;

pub use promptchain_config::{CliOverrides, Config};
pub use promptchain_engine::{Artifact, ChainContext, ChainOutcome, ChainPattern, PatternId};
pub use promptchain_llm::{GenerationBackend, GenerationRequest, GenerationResponse};
pub use promptchain_utils::error::ChainError;
pub use promptchain_utils::exit_codes::ExitCode;
