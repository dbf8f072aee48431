//! Exit code constants for the promptchain CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Chain halted with an artifact |
//! | 1 | `FAILURE` | Chain halted in failure or hit a fatal error |
//! | 2 | `CONFIG` | Invalid CLI arguments or configuration |
//! | 130 | `CANCELLED` | Run cancelled by the operator |

/// Type-safe exit code for `std::process::exit`.
///
/// Use the named constants for common exit codes and
/// [`as_i32()`](Self::as_i32) for the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - chain completed and the artifact was stored
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Failure - chain halted in failure, or a backend/parse/sink error
    pub const FAILURE: ExitCode = ExitCode(1);

    /// Configuration error - invalid CLI arguments or config file
    pub const CONFIG: ExitCode = ExitCode(2);

    /// Cancelled - the operator interrupted the run
    pub const CANCELLED: ExitCode = ExitCode(130);

    /// Get the numeric value for `std::process::exit`
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
