//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use salt_purge::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, LayoutConfig};
pub use crate::core::errors::{PurgeError, Result};

// Logging
pub use crate::logger::jsonl::JsonlWriter;

// Purge
pub use crate::purge::action::LifecycleAction;
pub use crate::purge::handler::PurgeHandler;
pub use crate::purge::pathset::{PathKind, PathSet};
pub use crate::purge::remover::{RemovalOutcome, Remover};
pub use crate::purge::report::{Outcome, PurgeReport, format_outcome_human};
pub use crate::purge::role::{Role, RoleSource};
