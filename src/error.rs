//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// State machine misuse. The state vocabulary is closed and known when a
/// machine is built, so these are programmer errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("state {0} is already registered")]
    DuplicateState(String),
    #[error("state {0} is not registered")]
    UnregisteredState(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
