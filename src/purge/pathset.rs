//! Path sets: the filesystem locations each role owns.

#![allow(missing_docs)]

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::config::LayoutConfig;
use crate::core::paths::rebase;
use crate::purge::role::Role;

/// What an owned path holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathKind {
    ConfigDir,
    ConfigDropIn,
    KeyStore,
    Cache,
    Log,
    Runtime,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigDir => f.write_str("config"),
            Self::ConfigDropIn => f.write_str("config-drop-in"),
            Self::KeyStore => f.write_str("key-store"),
            Self::Cache => f.write_str("cache"),
            Self::Log => f.write_str("log"),
            Self::Runtime => f.write_str("runtime"),
        }
    }
}

/// A single owned location, already rebased under the layout root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedPath {
    pub kind: PathKind,
    pub path: PathBuf,
}

/// The ordered list of paths a purge of `role` removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSet {
    pub role: Role,
    pub paths: Vec<OwnedPath>,
}

impl PathSet {
    /// Compute the set for `role` under `layout`. Nothing is cached.
    #[must_use]
    pub fn for_role(role: Role, layout: &LayoutConfig) -> Self {
        let templates = match role {
            Role::Master | Role::Minion | Role::Syndic => per_role_templates(role, layout),
            Role::Common => shared_templates(layout),
        };
        let paths = templates
            .into_iter()
            .map(|(kind, template)| OwnedPath {
                kind,
                path: rebase(&layout.root, &template),
            })
            .collect();
        Self { role, paths }
    }

    /// Iterate the rebased paths in removal order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(|owned| owned.path.as_path())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn per_role_templates(role: Role, layout: &LayoutConfig) -> Vec<(PathKind, PathBuf)> {
    let name = role.as_str();
    vec![
        (PathKind::ConfigDir, layout.config_dir.join(name)),
        (PathKind::ConfigDropIn, layout.config_dir.join(format!("{name}.d"))),
        (PathKind::KeyStore, layout.config_dir.join("pki").join(name)),
        (PathKind::Cache, layout.cache_dir.join(name)),
        (PathKind::Log, layout.log_dir.join(name)),
        (PathKind::Runtime, layout.run_dir.join(name)),
    ]
}

fn shared_templates(layout: &LayoutConfig) -> Vec<(PathKind, PathBuf)> {
    vec![
        (PathKind::ConfigDir, layout.config_dir.clone()),
        (PathKind::Cache, layout.cache_dir.clone()),
        (PathKind::Log, layout.log_dir.clone()),
        (PathKind::Runtime, layout.run_dir.clone()),
    ]
}
