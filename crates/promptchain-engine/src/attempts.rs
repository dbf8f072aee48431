//! Bounded attempt tracking
//!
//! Small state machine shared by the retrying patterns: the fallback
//! cascade walks an ordered list of candidates, the self-correct pattern
//! allows exactly one corrective round. Both reduce to "attempt index,
//! maximum attempts, stop on first success".

/// Tracks how many attempts have been made against a fixed maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedAttempts {
    max: usize,
    made: usize,
}

impl BoundedAttempts {
    /// Allow up to `max` attempts.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { max, made: 0 }
    }

    /// Begin the next attempt, returning its zero-based index, or `None`
    /// when the budget is exhausted.
    pub fn begin(&mut self) -> Option<usize> {
        if self.made >= self.max {
            return None;
        }
        let index = self.made;
        self.made += 1;
        Some(index)
    }

    /// Attempts made so far.
    #[must_use]
    pub fn made(&self) -> usize {
        self.made
    }

    /// Whether the attempt budget is used up.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.made >= self.max
    }
}
