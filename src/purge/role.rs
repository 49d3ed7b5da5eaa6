//! Package roles and how an invocation resolves to one.
//!
//! Maintainer scripts are installed as `<package>.postrm`, so the hook for
//! `salt-minion` runs as `.../salt-minion.postrm`. The role is the second
//! `-`-separated field of that basename, cut at the first `.`. An explicit
//! role (from `--role`) always wins over the name.

#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::errors::{PurgeError, Result};

/// The package variant whose state is being cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Master,
    Minion,
    Syndic,
    /// The shared package owning the top-level directories.
    Common,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Master, Self::Minion, Self::Syndic, Self::Common];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Minion => "minion",
            Self::Syndic => "syndic",
            Self::Common => "common",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PurgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| PurgeError::UnknownRole {
                role: s.to_string(),
            })
    }
}

/// Where the role comes from. Resolution is deferred until a purge needs it,
/// so dormant actions succeed even under an unrecognizable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSource {
    /// Typed role chosen by the caller.
    Explicit(Role),
    /// Role name given verbatim, e.g. from `--role`.
    Named(String),
    /// Program name to extract the role token from.
    InvocationName(String),
}

impl RoleSource {
    /// Resolve to a typed role.
    pub fn resolve(&self) -> Result<Role> {
        match self {
            Self::Explicit(role) => Ok(*role),
            Self::Named(name) => name.parse(),
            Self::InvocationName(name) => role_token(name).parse(),
        }
    }
}

/// Extract the role token from an invocation name.
///
/// Directories are stripped first. Without a `-` the whole basename is the
/// field, cut at the first `.`.
#[must_use]
pub fn role_token(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    let field = base.split('-').nth(1).unwrap_or(base);
    field.split('.').next().unwrap_or(field)
}
