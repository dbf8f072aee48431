//! Response extraction and structured payload parsing
//!
//! Two small, purely functional stages between a backend reply and a chain
//! decision: `strip_fences` normalizes raw response text, and `Payload`
//! parses it as strict JSON with typed field access.

pub mod extract;
pub mod parse;

pub use extract::strip_fences;
pub use parse::Payload;
