//! Package lifecycle actions a `postrm` hook is invoked with.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::errors::PurgeError;

/// The lifecycle transition the packaging tool reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleAction {
    /// Package removed, configuration kept.
    Remove,
    /// Package removed together with its configuration.
    Purge,
    /// Old version being replaced.
    Upgrade,
    /// New version's `postrm upgrade` failed, old version's hook retried.
    FailedUpgrade,
    /// Every file was overwritten by another package.
    Disappear,
    /// Installation aborted.
    AbortInstall,
    /// Upgrade aborted.
    AbortUpgrade,
}

impl LifecycleAction {
    /// Every recognized action, in dpkg's documented order.
    pub const ALL: [Self; 7] = [
        Self::Remove,
        Self::Purge,
        Self::Upgrade,
        Self::FailedUpgrade,
        Self::Disappear,
        Self::AbortInstall,
        Self::AbortUpgrade,
    ];

    /// Literal argument string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Purge => "purge",
            Self::Upgrade => "upgrade",
            Self::FailedUpgrade => "failed-upgrade",
            Self::Disappear => "disappear",
            Self::AbortInstall => "abort-install",
            Self::AbortUpgrade => "abort-upgrade",
        }
    }

    /// Only `purge` deletes anything; the rest keep the user's files.
    #[must_use]
    pub const fn deletes_state(self) -> bool {
        matches!(self, Self::Purge)
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleAction {
    type Err = PurgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| PurgeError::UnknownAction {
                action: s.to_string(),
            })
    }
}
