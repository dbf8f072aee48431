//! promptchain CLI binary
//!
//! Minimal entrypoint; all logic is in the library. main.rs only maps the
//! result of cli::run() to a process exit code.

fn main() {
    if let Err(code) = promptchain::cli::run() {
        std::process::exit(code.as_i32());
    }
}
