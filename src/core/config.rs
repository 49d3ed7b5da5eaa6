//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{PurgeError, Result};
use crate::core::paths::{is_filesystem_root, normalize_syntactic};

/// Default location of the optional config file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/salt-purge.toml";

/// Full purge-hook configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub purge: PurgeConfig,
    pub logging: LoggingConfig,
    /// Where this config was loaded from (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Base directories the path templates are rooted at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Prefix every template is rebased under (staging trees, chroots).
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
    pub run_dir: PathBuf,
}

/// Purge execution knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PurgeConfig {
    /// Report what would be removed without touching anything.
    pub dry_run: bool,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only JSONL activity log. Unset disables the file sink.
    pub jsonl_path: Option<PathBuf>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            config_dir: PathBuf::from("/etc/salt"),
            cache_dir: PathBuf::from("/var/cache/salt"),
            log_dir: PathBuf::from("/var/log/salt"),
            run_dir: PathBuf::from("/var/run/salt"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, env_var)
    }

    /// Like [`Config::load`] with an injectable env lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| PurgeError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let mut parsed: Self = toml::from_str(&raw)?;
            parsed.source = Some(path_buf);
            parsed
        } else if is_explicit_path {
            return Err(PurgeError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(lookup)?;
        cfg.normalize_paths();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        for (name, slot) in [
            ("SALT_PURGE_ROOT", &mut self.layout.root),
            ("SALT_PURGE_CONFIG_DIR", &mut self.layout.config_dir),
            ("SALT_PURGE_CACHE_DIR", &mut self.layout.cache_dir),
            ("SALT_PURGE_LOG_DIR", &mut self.layout.log_dir),
            ("SALT_PURGE_RUN_DIR", &mut self.layout.run_dir),
        ] {
            if let Some(raw) = lookup(name) {
                *slot = PathBuf::from(raw);
            }
        }

        if let Some(raw) = lookup("SALT_PURGE_DRY_RUN") {
            self.purge.dry_run = parse_env_bool("SALT_PURGE_DRY_RUN", &raw)?;
        }

        if let Some(raw) = lookup("SALT_PURGE_JSONL_PATH") {
            self.logging.jsonl_path = Some(PathBuf::from(raw));
        }

        Ok(())
    }

    /// Strip trailing slashes and `.`/`..` so path comparisons are stable.
    pub fn normalize_paths(&mut self) {
        for path in [
            &mut self.layout.root,
            &mut self.layout.config_dir,
            &mut self.layout.cache_dir,
            &mut self.layout.log_dir,
            &mut self.layout.run_dir,
        ] {
            if path.is_absolute() {
                *path = normalize_syntactic(path);
            }
        }
    }

    /// Check layout invariants. Called by [`Config::load`]; call again after
    /// overriding fields from the command line.
    pub fn validate(&self) -> Result<()> {
        if !self.layout.root.is_absolute() {
            return Err(PurgeError::InvalidConfig {
                details: format!(
                    "layout.root must be an absolute path, got {}",
                    self.layout.root.display()
                ),
            });
        }

        for (name, dir) in [
            ("config_dir", &self.layout.config_dir),
            ("cache_dir", &self.layout.cache_dir),
            ("log_dir", &self.layout.log_dir),
            ("run_dir", &self.layout.run_dir),
        ] {
            if !dir.is_absolute() {
                return Err(PurgeError::InvalidConfig {
                    details: format!("layout.{name} must be an absolute path, got {}", dir.display()),
                });
            }
            if is_filesystem_root(dir) {
                return Err(PurgeError::InvalidConfig {
                    details: format!("layout.{name} must not be the filesystem root"),
                });
            }
        }

        if let Some(log) = &self.logging.jsonl_path
            && !log.is_absolute()
        {
            return Err(PurgeError::InvalidConfig {
                details: format!(
                    "logging.jsonl_path must be an absolute path, got {}",
                    log.display()
                ),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PurgeError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: expected a boolean"),
        }),
    }
}
