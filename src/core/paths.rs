//! Shared path manipulation utilities.

use std::path::{Component, Path, PathBuf};

/// Rebase an absolute path template under `root`.
///
/// `rebase("/", "/etc/salt")` is `/etc/salt`; `rebase("/stage", "/etc/salt")`
/// is `/stage/etc/salt`. Relative templates are joined as-is.
pub fn rebase(root: &Path, template: &Path) -> PathBuf {
    let relative: PathBuf = template
        .components()
        .filter(|c| !matches!(c, Component::Prefix(..) | Component::RootDir))
        .collect();
    normalize_syntactic(&root.join(relative))
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root directory.
pub fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}

/// Whether `path` is the filesystem root once normalized.
pub fn is_filesystem_root(path: &Path) -> bool {
    let normalized = normalize_syntactic(path);
    normalized.is_absolute() && normalized.parent().is_none()
}
