//! External input for interactive chains
//!
//! The human-in-the-loop pattern blocks on one line of external text per
//! iteration. The trait keeps the suspension point injectable: stdin in
//! production, a scripted sequence in tests.

use std::io::{BufRead, Write};

/// Source of one line of operator input per call.
pub trait InputSource: Send {
    /// Read the next instruction. Blocks indefinitely; returns `None` at
    /// end of input (treated like the sentinel by callers).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the underlying read fails.
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;
}

/// Blocking stdin input.
#[derive(Default)]
pub struct StdinSource;

impl StdinSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for StdinSource {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let bytes = std::io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Scripted input for tests; yields each line once, then end-of-input.
pub struct ScriptedSource {
    lines: std::vec::IntoIter<String>,
    pub reads: usize,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|s| (*s).to_string())
                .collect::<Vec<_>>()
                .into_iter(),
            reads: 0,
        }
    }
}

impl InputSource for ScriptedSource {
    fn read_line(&mut self, _prompt: &str) -> std::io::Result<Option<String>> {
        self.reads += 1;
        Ok(self.lines.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_yields_then_ends() {
        let mut source = ScriptedSource::new(&["first", "second"]);
        assert_eq!(source.read_line("> ").unwrap(), Some("first".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), Some("second".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), None);
        assert_eq!(source.reads, 3);
    }
}
