//! Error kinds returned by the configuration core.
//!
//! The registry, document and store never log or print. They return a
//! [`ConfigError`] and leave formatting and the fatal/recoverable decision to
//! the command layer, which can match on the variant.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::values::ParseError;

/// Why a profile name was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidNameReason {
    Empty,
    Duplicate,
    BadFormat,
    Reserved,
}

impl fmt::Display for InvalidNameReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Empty => "name cannot be empty",
            Self::Duplicate => "profile already exists",
            Self::BadFormat => {
                "name must contain only alphanumeric characters, underscores, and dashes"
            }
            Self::Reserved => "name cannot be the same as the active profile key",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid number of arguments: expected {expected}, got {actual}")]
    InvalidArgumentCount { expected: &'static str, actual: usize },

    #[error(
        "key '{key}' is not recognized as a valid configuration key.\n\
         Use 'pingcli config list-keys' to view all available keys.\n\
         Valid keys: {}",
        valid_keys.join(", ")
    )]
    UnknownConfigKey { key: String, valid_keys: Vec<String> },

    #[error("invalid profile name '{name}': {reason}")]
    InvalidProfileName {
        name: String,
        reason: InvalidNameReason,
    },

    #[error("profile '{name}' does not exist")]
    ProfileNotFound { name: String },

    #[error("'{name}' is the active profile and cannot be deleted")]
    ActiveProfileProtected { name: String },

    #[error("invalid value for key '{key}'")]
    ValueParse {
        key: String,
        #[source]
        source: ParseError,
    },

    #[error("value for key '{key}' is empty. Use 'pingcli config unset {key}' to unset the key")]
    EmptyValueOnSet { key: String },

    #[error("invalid assignment '{arg}': expected 'key=value'")]
    InvalidAssignment { arg: String },

    #[error("configuration file '{}' does not exist", path.display())]
    ConfigFileMissing { path: PathBuf },

    #[error("failed to read configuration file '{}'", path.display())]
    ConfigFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write configuration file '{}'", path.display())]
    ConfigFileUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file '{}' is not valid YAML", path.display())]
    ConfigFileMalformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration document: {reason}")]
    InvalidDocument { reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn unknown_key(key: &str, valid_keys: Vec<String>) -> Self {
        Self::UnknownConfigKey {
            key: key.to_string(),
            valid_keys,
        }
    }

    pub(crate) fn invalid_name(name: &str, reason: InvalidNameReason) -> Self {
        Self::InvalidProfileName {
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Self::ProfileNotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Errors that abort the whole invocation rather than a single command
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigFileMissing { .. }
                | Self::ConfigFileUnreadable { .. }
                | Self::ConfigFileMalformed { .. }
                | Self::InvalidDocument { .. }
        )
    }
}
