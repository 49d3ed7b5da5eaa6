#![forbid(unsafe_code)]

//! salt-purge: the `postrm` hook for Salt's master, minion, syndic and common
//! packages.
//!
//! On `purge` it removes the configuration, keys, caches, logs and runtime
//! state the package's role owns. Every other lifecycle action keeps them.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use salt_purge::prelude::*;
//!
//! let config = Config::load(None)?;
//! let mut handler = PurgeHandler::new(config);
//! let outcome = handler.handle("purge", &RoleSource::Explicit(Role::Minion))?;
//! # Ok::<(), PurgeError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod purge;
