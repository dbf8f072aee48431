//! Error types for promptchain
//!
//! Each concern carries its own error enum (`BackendError`, `ParseError`,
//! `SinkError`, `ConfigError`); `ChainError` unifies them at the chain and
//! CLI boundary. Library code returns these types and never calls
//! `std::process::exit`.

use std::time::Duration;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Maximum number of characters of offending text preserved in a
/// `ParseError` diagnostic.
const SNIPPET_MAX_CHARS: usize = 200;

/// Top-level error type returned by chain execution.
///
/// Terminal chain *failure* (an evaluator rejecting every candidate, say) is
/// not an error — patterns report it as a normal outcome. `ChainError` covers
/// the fatal paths: the backend could not produce text, a required payload
/// did not parse, the artifact could not be persisted, or the run was
/// cancelled.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Artifact sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),

    #[error("Chain cancelled before completion")]
    Cancelled,
}

impl ChainError {
    /// Map this error to a CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CONFIG,
            Self::Cancelled => ExitCode::CANCELLED,
            _ => ExitCode::FAILURE,
        }
    }
}

/// Failure to obtain a completion from a generation backend.
///
/// The core never retries at this layer; retry and fallback are
/// pattern-level decisions.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport-level failure (HTTP connectivity, malformed response body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider authentication failure (401, 403, missing API key)
    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    /// Provider quota/rate limit exceeded (429)
    #[error("Provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Provider service outage (5xx errors)
    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    /// Invocation timed out
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// Configuration error
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unsupported provider or feature
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Failure to interpret extracted backend output as structured data.
///
/// Strict pass/fail: no partial-parse recovery. The offending text travels
/// with the error, truncated to a displayable snippet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("response is not valid JSON: {reason} (text: {snippet:?})")]
    InvalidJson { snippet: String, reason: String },

    #[error("expected field '{field}' missing from response payload")]
    MissingField { field: String },

    #[error("field '{field}' has the wrong type, expected {expected}")]
    WrongType { field: String, expected: String },

    #[error("label '{label}' not in allowed set [{allowed}]")]
    UnknownLabel { label: String, allowed: String },
}

impl ParseError {
    /// Build an `InvalidJson` error, truncating the offending text to a
    /// displayable snippet.
    #[must_use]
    pub fn invalid_json(text: &str, reason: impl Into<String>) -> Self {
        Self::InvalidJson {
            snippet: truncate_snippet(text),
            reason: reason.into(),
        }
    }
}

/// Truncate text for inclusion in an error message.
#[must_use]
pub fn truncate_snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{truncated}…")
    }
}

/// Failure to persist a chain's final artifact.
///
/// Always surfaced to the operator, never retried automatically.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to write artifact to {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}
