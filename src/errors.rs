//! Error types shared by the throttle cache, the settings store, the command
//! runner and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// The settings store could not be read or written.
///
/// Every variant is a flavour of the "store unavailable" condition. Readers
/// degrade to an empty store when they see one; writers hand it back to the
/// caller untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings file {} has an invalid timestamp for '{key}': {value}", path.display())]
    InvalidTimestamp {
        path: PathBuf,
        key: String,
        value: String,
    },

    #[error("cannot serialize settings for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write settings file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of [`crate::libs::throttle::ThrottleCache::run_if_due`].
#[derive(Debug, Error)]
pub enum RunError<E> {
    /// The guarded operation failed. The error is passed through as-is and
    /// nothing was recorded.
    #[error(transparent)]
    OperationFailed(E),

    /// The guarded operation succeeded but its run could not be recorded.
    #[error("operation succeeded but its run was not recorded: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl<E> RunError<E> {
    /// Returns `true` when the guarded operation ran to completion, which is
    /// the case for a store failure but not for an operation failure.
    pub fn operation_ran(&self) -> bool {
        matches!(self, RunError::StoreUnavailable(_))
    }
}

/// An action key was empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("action key must not be empty")]
pub struct InvalidActionKey;

/// Spawning or running an external command failed.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no command given")]
    Empty,

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: String },
}

/// The optional YAML configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
