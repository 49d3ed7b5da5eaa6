//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::{Colorize, control};
use thiserror::Error;

use salt_purge::core::config::Config;
use salt_purge::core::errors::PurgeError;
use salt_purge::purge::action::LifecycleAction;
use salt_purge::purge::handler::PurgeHandler;
use salt_purge::purge::remover::RemovalOutcome;
use salt_purge::purge::report::{Outcome, format_outcome_human};
use salt_purge::purge::role::RoleSource;

/// Salt package `postrm` hook: removes role state on purge.
#[derive(Debug, Parser)]
#[command(
    name = "salt-postrm",
    author,
    version,
    about = "Remove Salt configuration, keys, caches, logs and runtime state on package purge",
    long_about = None
)]
pub struct Cli {
    /// Lifecycle action from the packaging tool (remove, purge, upgrade,
    /// failed-upgrade, disappear, abort-install, abort-upgrade).
    #[arg(value_name = "ACTION")]
    action: Option<String>,
    /// Arguments dpkg appends after the action (versions, package names). Ignored.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    extra: Vec<String>,
    /// Package role (master, minion, syndic, common). Defaults to the role
    /// encoded in the program name, e.g. `salt-minion.postrm`.
    #[arg(long, value_name = "ROLE")]
    role: Option<String>,
    /// Rebase every purged path under this directory.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Report what would be removed without removing anything.
    #[arg(long)]
    dry_run: bool,
    /// Print the outcome as a JSON line.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Print the outcome and echo non-fatal removal failures to stderr.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Silent,
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unrecognized action or role.
    #[error("{0}")]
    User(String),
    /// Configuration or environment failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the hook.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<PurgeError> for CliError {
    fn from(err: PurgeError) -> Self {
        if err.is_unrecognized_input() {
            Self::User(err.diagnostic())
        } else {
            Self::Runtime(err.to_string())
        }
    }
}

/// Run one hook invocation. `invoked` is argv[0] as given.
pub fn run(cli: &Cli, invoked: &str) -> Result<(), CliError> {
    if cli.no_color || !io::stdout().is_terminal() {
        control::set_override(false);
    }

    let action = cli.action.as_deref().unwrap_or("");
    let purging = action
        .parse::<LifecycleAction>()
        .is_ok_and(LifecycleAction::deletes_state);
    let config = match effective_config(cli) {
        Ok(config) => config,
        // Only a purge reads the layout. Other actions run on defaults,
        // which also leave the activity log off.
        Err(err) if !purging => {
            if cli.verbose {
                eprintln!("{invoked} warning: {err}");
            }
            Config::default()
        }
        Err(err) => return Err(err),
    };
    let source = cli.role.as_ref().map_or_else(
        || RoleSource::InvocationName(invoked.to_string()),
        |role| RoleSource::Named(role.clone()),
    );

    let mut handler = PurgeHandler::new(config);
    let outcome = handler.handle(action, &source)?;

    if cli.verbose
        && let Outcome::Purged(report) = &outcome
    {
        for entry in report.failures() {
            if let RemovalOutcome::Failed { error, .. } = &entry.outcome {
                eprintln!("{invoked} warning: {error}");
            }
        }
    }

    let env_mode = std::env::var("SALT_PURGE_OUTPUT_FORMAT").ok();
    match resolve_output_mode(cli, env_mode.as_deref()) {
        OutputMode::Silent => Ok(()),
        OutputMode::Human => write_human(&outcome),
        OutputMode::Json => write_json_line(&outcome),
    }
}

fn effective_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        config.layout.root.clone_from(root);
        config.normalize_paths();
    }
    if cli.dry_run {
        config.purge.dry_run = true;
    }
    config.validate()?;
    Ok(config)
}

fn write_human(outcome: &Outcome) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    for line in format_outcome_human(outcome).lines() {
        let painted = if line.contains("[FAIL]") {
            line.red().to_string()
        } else if line.contains("[DONE]") {
            line.green().to_string()
        } else if line.contains("[PLAN]") {
            line.yellow().to_string()
        } else if line.contains("[GONE]") {
            line.dimmed().to_string()
        } else {
            line.to_string()
        };
        writeln!(stdout, "{painted}")?;
    }
    Ok(())
}

fn write_json_line(outcome: &Outcome) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, outcome)?;
    writeln!(stdout)?;
    Ok(())
}

fn resolve_output_mode(cli: &Cli, env_mode: Option<&str>) -> OutputMode {
    if cli.json {
        return OutputMode::Json;
    }
    if cli.quiet {
        return OutputMode::Silent;
    }

    let fallback = if cli.verbose || cli.dry_run {
        OutputMode::Human
    } else {
        OutputMode::Silent
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("salt-postrm").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn trailing_dpkg_arguments_are_accepted() {
        let cli = parse(&["upgrade", "3006.1+ds-1"]);
        assert_eq!(cli.action.as_deref(), Some("upgrade"));
        assert_eq!(cli.extra, vec!["3006.1+ds-1"]);

        let cli = parse(&["disappear", "salt-ng", "1.0"]);
        assert_eq!(cli.extra.len(), 2);
    }

    #[test]
    fn missing_action_still_parses() {
        let cli = parse(&[]);
        assert_eq!(cli.action, None);
        assert!(cli.extra.is_empty());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["salt-postrm", "-v", "-q", "purge"]).is_err());
    }

    #[test]
    fn flags_before_action_parse() {
        let cli = parse(&["--role", "syndic", "--root", "/srv/stage", "--dry-run", "purge"]);
        assert_eq!(cli.role.as_deref(), Some("syndic"));
        assert_eq!(cli.root, Some(PathBuf::from("/srv/stage")));
        assert!(cli.dry_run);
        assert_eq!(cli.action.as_deref(), Some("purge"));
    }

    #[test]
    fn output_mode_resolution_honors_precedence() {
        let default = parse(&["purge"]);
        assert_eq!(resolve_output_mode(&default, None), OutputMode::Silent);
        assert_eq!(resolve_output_mode(&default, Some("json")), OutputMode::Json);
        assert_eq!(resolve_output_mode(&default, Some(" Human ")), OutputMode::Human);
        assert_eq!(resolve_output_mode(&default, Some("auto")), OutputMode::Silent);

        let json = parse(&["--json", "purge"]);
        assert_eq!(resolve_output_mode(&json, Some("human")), OutputMode::Json);

        let quiet = parse(&["-q", "--dry-run", "purge"]);
        assert_eq!(resolve_output_mode(&quiet, Some("json")), OutputMode::Silent);

        let verbose = parse(&["-v", "purge"]);
        assert_eq!(resolve_output_mode(&verbose, None), OutputMode::Human);

        let dry_run = parse(&["--dry-run", "purge"]);
        assert_eq!(resolve_output_mode(&dry_run, None), OutputMode::Human);
    }

    #[test]
    fn purge_errors_map_to_exit_codes() {
        let user: CliError = PurgeError::UnknownAction {
            action: "reinstall".to_string(),
        }
        .into();
        assert_eq!(user.exit_code(), 1);
        assert_eq!(user.to_string(), "unknown action 'reinstall'");

        let role: CliError = PurgeError::UnknownRole {
            role: "api".to_string(),
        }
        .into();
        assert_eq!(role.exit_code(), 1);
        assert_eq!(role.to_string(), "unknown package 'api'");

        let runtime: CliError = PurgeError::InvalidConfig {
            details: "bad".to_string(),
        }
        .into();
        assert_eq!(runtime.exit_code(), 2);
    }
}
