//! The purge handler: validates the action, resolves the role on demand, and
//! removes the role's path set.

use crate::core::config::Config;
use crate::core::errors::{PurgeError, Result};
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
use crate::purge::action::LifecycleAction;
use crate::purge::pathset::PathSet;
use crate::purge::remover::{RemovalOutcome, Remover};
use crate::purge::report::{Outcome, PurgeEntry, PurgeReport};
use crate::purge::role::{Role, RoleSource};

/// Runs one hook invocation against a layout.
pub struct PurgeHandler {
    config: Config,
    log: JsonlWriter,
}

impl PurgeHandler {
    /// Handler logging to the JSONL path named in `config`, if any.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let log = JsonlWriter::open(config.logging.jsonl_path.clone());
        Self { config, log }
    }

    /// Handler with an explicit log writer.
    #[must_use]
    pub fn with_log(config: Config, log: JsonlWriter) -> Self {
        Self { config, log }
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle a raw action argument. Unknown actions fail before the role is
    /// looked at and before anything is touched.
    pub fn handle(&mut self, action: &str, role: &RoleSource) -> Result<Outcome> {
        let action = match action.parse::<LifecycleAction>() {
            Ok(action) => action,
            Err(err) => {
                self.log.write_entry(
                    &LogEntry::new(EventType::UnknownAction, Severity::Warning)
                        .with_action(action)
                        .with_error(&err),
                );
                return Err(err);
            }
        };
        self.dispatch(action, role)
    }

    /// Dispatch a typed action.
    pub fn dispatch(&mut self, action: LifecycleAction, role: &RoleSource) -> Result<Outcome> {
        match action {
            LifecycleAction::Remove
            | LifecycleAction::Upgrade
            | LifecycleAction::FailedUpgrade
            | LifecycleAction::Disappear
            | LifecycleAction::AbortInstall
            | LifecycleAction::AbortUpgrade => {
                self.log.write_entry(
                    &LogEntry::new(EventType::ActionIgnored, Severity::Info)
                        .with_action(action.as_str()),
                );
                Ok(Outcome::Dormant { action })
            }
            LifecycleAction::Purge => {
                let role = self.resolve_role(role)?;
                Ok(Outcome::Purged(self.purge(role)))
            }
        }
    }

    /// Remove every path `role` owns. Individual failures are recorded in the
    /// report and never abort the remaining removals.
    pub fn purge(&mut self, role: Role) -> PurgeReport {
        let layout = &self.config.layout;
        let dry_run = self.config.purge.dry_run;
        let set = PathSet::for_role(role, layout);
        let remover = Remover::new(&layout.root, dry_run);
        let mut report = PurgeReport::new(role, dry_run);

        let mut start = LogEntry::new(EventType::PurgeStart, Severity::Info)
            .with_action(LifecycleAction::Purge.as_str())
            .with_role(role.as_str());
        start.dry_run = Some(dry_run);
        self.log.write_entry(&start);

        for owned in set.paths {
            let outcome = remover.remove(&owned.path);
            let entry = outcome_entry(&outcome)
                .with_role(role.as_str())
                .with_path(&owned.path);
            self.log.write_entry(&entry);
            report.record(PurgeEntry {
                kind: owned.kind,
                path: owned.path,
                outcome,
            });
        }

        let mut done = LogEntry::new(
            EventType::PurgeComplete,
            if report.failed_count == 0 {
                Severity::Info
            } else {
                Severity::Warning
            },
        )
        .with_role(role.as_str());
        done.size = Some(report.bytes_freed);
        done.dry_run = Some(dry_run);
        done.details = Some(format!(
            "removed={} absent={} planned={} failed={}",
            report.removed_count, report.absent_count, report.planned_count, report.failed_count
        ));
        self.log.write_entry(&done);
        self.log.flush();

        report
    }

    fn resolve_role(&mut self, source: &RoleSource) -> Result<Role> {
        source.resolve().inspect_err(|err| {
            let raw = match err {
                PurgeError::UnknownRole { role } => role.clone(),
                other => other.to_string(),
            };
            self.log.write_entry(
                &LogEntry::new(EventType::UnknownRole, Severity::Warning)
                    .with_action(LifecycleAction::Purge.as_str())
                    .with_role(raw)
                    .with_error(err),
            );
        })
    }
}

fn outcome_entry(outcome: &RemovalOutcome) -> LogEntry {
    match outcome {
        RemovalOutcome::Removed { bytes } => {
            let mut entry = LogEntry::new(EventType::PathRemoved, Severity::Info);
            entry.size = Some(*bytes);
            entry
        }
        RemovalOutcome::Absent => LogEntry::new(EventType::PathAbsent, Severity::Info),
        RemovalOutcome::Planned { bytes } => {
            let mut entry = LogEntry::new(EventType::PathPlanned, Severity::Info);
            entry.size = Some(*bytes);
            entry
        }
        RemovalOutcome::Failed { code, error } => {
            let mut entry = LogEntry::new(EventType::PathFailed, Severity::Warning);
            entry.error_code = Some(code.clone());
            entry.error_message = Some(error.clone());
            entry
        }
    }
}
