//! Error types for the request-composition core.
//!
//! # Design
//! Only `ImportError` is ever propagated to a caller: a pasted command with
//! no URL cannot produce a request. `JsonError` is recovered where it
//! happens (the original text is kept) and exists so the recovery sites
//! can log what went wrong. `ConfigError` covers malformed configuration.

use std::fmt;

/// Errors returned when importing a pasted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// No `http://` or `https://` token was found in the command text.
    InvalidCommand { reason: String },
}

impl ImportError {
    pub(crate) fn missing_url() -> Self {
        ImportError::InvalidCommand {
            reason: "missing or invalid URL".to_string(),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::InvalidCommand { reason } => write!(f, "invalid command: {reason}"),
        }
    }
}

impl std::error::Error for ImportError {}

/// A document that could not be canonicalized as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonError {
    Malformed(String),
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::Malformed(msg) => write!(f, "malformed JSON: {msg}"),
        }
    }
}

impl std::error::Error for JsonError {}

/// Errors produced while loading a `ViewConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse failed: {msg}"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
