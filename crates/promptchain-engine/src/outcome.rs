//! Chain outcomes and artifacts

/// Final text product of a chain, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Destination file name (relative to the sink's output directory)
    pub name: String,
    /// Artifact content
    pub text: String,
}

impl Artifact {
    /// Create a new artifact.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Terminal state of one chain run.
///
/// Halting in failure is a normal, reportable outcome, distinct from the
/// fatal errors in `ChainError`: a cascade whose evaluator rejected every
/// candidate has *completed*, with no artifact to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Chain produced an artifact. `warnings` records locally recovered
    /// problems (e.g., a skipped fan-out sub-task).
    Success {
        artifact: Artifact,
        warnings: Vec<String>,
    },
    /// Chain halted without an artifact.
    Failure { diagnostic: String },
}

impl ChainOutcome {
    /// Success with no warnings.
    #[must_use]
    pub fn success(artifact: Artifact) -> Self {
        Self::Success {
            artifact,
            warnings: Vec::new(),
        }
    }

    /// Failure with a diagnostic.
    #[must_use]
    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self::Failure {
            diagnostic: diagnostic.into(),
        }
    }

    /// Whether this outcome carries an artifact.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
