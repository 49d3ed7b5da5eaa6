//! JSONL activity log: append-only line-delimited JSON describing each purge.
//!
//! Each line is a self-contained JSON object assembled in memory and written
//! with a single `write_all`, so a concurrent `tail -f` never sees half a line.
//!
//! Degradation chain:
//! 1. Configured file path
//! 2. stderr with `[SALT-PURGE-JSONL]` prefix
//! 3. Silent discard (a logging failure must never fail the package hook)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::PurgeError;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Log event types for the purge lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PurgeStart,
    PathRemoved,
    PathAbsent,
    PathPlanned,
    PathFailed,
    PurgeComplete,
    ActionIgnored,
    UnknownAction,
    UnknownRole,
}

/// A single JSONL log entry; only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Bytes removed (or that would be removed in a dry-run).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            action: None,
            role: None,
            path: None,
            size: None,
            dry_run: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }

    #[must_use]
    pub fn with_error(mut self, err: &PurgeError) -> Self {
        self.error_code = Some(err.code().to_string());
        self.error_message = Some(err.to_string());
        self
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

/// Append-only JSONL writer with stderr fallback.
pub struct JsonlWriter {
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
    state: WriterState,
}

impl JsonlWriter {
    /// Open the log file. `None` disables logging entirely.
    pub fn open(path: Option<PathBuf>) -> Self {
        let mut w = Self {
            path,
            writer: None,
            state: WriterState::Discard,
        };
        w.try_open();
        w
    }

    /// A writer that drops everything.
    pub fn disabled() -> Self {
        Self::open(None)
    }

    /// Write a single log entry as one JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[SALT-PURGE-JSONL] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    /// Flush buffered lines and sync them to disk.
    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            if w.flush().is_err() {
                self.degrade();
                return;
            }
            let _ = w.get_ref().sync_data();
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    fn write_line(&mut self, line: &str) {
        match self.state {
            WriterState::Normal => {
                if let Some(w) = self.writer.as_mut()
                    && w.write_all(line.as_bytes()).is_ok()
                {
                    return;
                }
                self.degrade();
                self.write_line(line);
            }
            WriterState::Stderr => {
                let _ = write!(io::stderr(), "[SALT-PURGE-JSONL] {line}");
            }
            WriterState::Discard => {}
        }
    }

    fn try_open(&mut self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        match open_append(path) {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                self.state = WriterState::Normal;
            }
            Err(e) => {
                let _ = writeln!(
                    io::stderr(),
                    "[SALT-PURGE-JSONL] cannot open {}: {e}; logging to stderr",
                    path.display()
                );
                self.state = WriterState::Stderr;
            }
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        self.state = match self.state {
            WriterState::Normal => WriterState::Stderr,
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
