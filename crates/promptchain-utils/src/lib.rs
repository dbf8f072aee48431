//! Foundation utilities for promptchain
//!
//! Error taxonomy, exit codes, tracing initialization, and atomic file
//! writes shared by all promptchain crates.

pub mod atomic_write;
pub mod error;
pub mod exit_codes;
pub mod logging;
