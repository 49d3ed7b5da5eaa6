//! SP-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, PurgeError>;

/// Top-level error type for the purge hook.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("[SP-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SP-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SP-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SP-1101] unknown action '{action}'")]
    UnknownAction { action: String },

    #[error("[SP-1102] unknown package '{role}'")]
    UnknownRole { role: String },

    #[error("[SP-2003] safety veto for {path}: {reason}")]
    SafetyVeto { path: PathBuf, reason: String },

    #[error("[SP-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SP-3001] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[SP-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PurgeError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SP-1001",
            Self::MissingConfig { .. } => "SP-1002",
            Self::ConfigParse { .. } => "SP-1003",
            Self::UnknownAction { .. } => "SP-1101",
            Self::UnknownRole { .. } => "SP-1102",
            Self::SafetyVeto { .. } => "SP-2003",
            Self::Serialization { .. } => "SP-2101",
            Self::PermissionDenied { .. } => "SP-3001",
            Self::Io { .. } => "SP-3002",
        }
    }

    /// Whether the caller supplied something the hook does not recognize.
    ///
    /// These map to exit code 1 and never touch the filesystem.
    #[must_use]
    pub const fn is_unrecognized_input(&self) -> bool {
        matches!(self, Self::UnknownAction { .. } | Self::UnknownRole { .. })
    }

    /// Message without the bracketed code, as printed after the invoked name.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::UnknownAction { action } => format!("unknown action '{action}'"),
            Self::UnknownRole { role } => format!("unknown package '{role}'"),
            other => other.to_string(),
        }
    }

    /// Convenience constructor for IO errors with a known path.
    ///
    /// `PermissionDenied` is split out so reports can tell the two apart.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Io { path, source }
        }
    }
}

impl From<serde_json::Error> for PurgeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for PurgeError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
