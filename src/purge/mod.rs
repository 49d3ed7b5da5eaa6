//! Purge handling: lifecycle actions, roles, path sets, removal and reports.

pub mod action;
pub mod handler;
pub mod pathset;
pub mod remover;
pub mod report;
pub mod role;
