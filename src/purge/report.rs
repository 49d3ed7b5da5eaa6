//! Purge reports: what was removed, what was already gone, what failed.

#![allow(missing_docs)]

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::purge::action::LifecycleAction;
use crate::purge::pathset::PathKind;
use crate::purge::remover::RemovalOutcome;
use crate::purge::role::Role;

/// One owned path and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeEntry {
    pub kind: PathKind,
    pub path: PathBuf,
    pub outcome: RemovalOutcome,
}

/// Complete purge report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub role: Role,
    pub action: LifecycleAction,
    pub dry_run: bool,
    /// RFC 3339 UTC timestamp of the purge.
    pub timestamp: String,
    pub entries: Vec<PurgeEntry>,
    pub removed_count: usize,
    pub absent_count: usize,
    pub planned_count: usize,
    pub failed_count: usize,
    pub bytes_freed: u64,
}

impl PurgeReport {
    /// Start an empty report for `role`.
    #[must_use]
    pub fn new(role: Role, dry_run: bool) -> Self {
        Self {
            role,
            action: LifecycleAction::Purge,
            dry_run,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            entries: Vec::new(),
            removed_count: 0,
            absent_count: 0,
            planned_count: 0,
            failed_count: 0,
            bytes_freed: 0,
        }
    }

    /// Record an entry and update the counters.
    pub fn record(&mut self, entry: PurgeEntry) {
        match &entry.outcome {
            RemovalOutcome::Removed { bytes } => {
                self.removed_count += 1;
                self.bytes_freed += bytes;
            }
            RemovalOutcome::Absent => self.absent_count += 1,
            RemovalOutcome::Planned { .. } => self.planned_count += 1,
            RemovalOutcome::Failed { .. } => self.failed_count += 1,
        }
        self.entries.push(entry);
    }

    /// Entries whose removal failed.
    pub fn failures(&self) -> impl Iterator<Item = &PurgeEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, RemovalOutcome::Failed { .. }))
    }
}

/// Result of one hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A non-purge action: nothing touched.
    Dormant { action: LifecycleAction },
    /// A purge ran (or was planned).
    Purged(PurgeReport),
}

/// Format an outcome for terminal output.
#[must_use]
pub fn format_outcome_human(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Dormant { action } => {
            format!("Action '{action}': configuration preserved, nothing removed.\n")
        }
        Outcome::Purged(report) => format_report_human(report),
    }
}

/// Format a purge report for terminal output.
#[must_use]
pub fn format_report_human(report: &PurgeReport) -> String {
    let mut out = String::new();

    if report.dry_run {
        let _ = writeln!(out, "Purge plan for {} (dry-run)\n", report.role);
    } else {
        let _ = writeln!(out, "Purge report for {}\n", report.role);
    }

    for entry in &report.entries {
        let status = match entry.outcome {
            RemovalOutcome::Removed { .. } => "DONE",
            RemovalOutcome::Absent => "GONE",
            RemovalOutcome::Planned { .. } => "PLAN",
            RemovalOutcome::Failed { .. } => "FAIL",
        };
        let _ = writeln!(
            out,
            "  [{status}] {}: {}",
            entry.kind,
            entry.path.display()
        );
        if let RemovalOutcome::Failed { error, .. } = &entry.outcome {
            let _ = writeln!(out, "        error: {error}");
        }
    }

    if report.dry_run {
        let _ = writeln!(
            out,
            "\n{} path(s) would be removed. Run without --dry-run to execute.",
            report.planned_count
        );
    } else {
        let _ = writeln!(
            out,
            "\nSummary: {} removed, {} already absent, {} failed, {} bytes freed",
            report.removed_count, report.absent_count, report.failed_count, report.bytes_freed
        );
    }

    out
}
