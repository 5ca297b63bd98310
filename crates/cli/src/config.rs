// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel.toml` loading and override resolution.
//!
//! Precedence is flags, then environment, then file, then defaults.
//! Relative paths inside a config file resolve against the file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE: &str = "keel.toml";
pub const DEFAULT_DATABASE: &str = "keel.db";
pub const DEFAULT_LOG_FILTER: &str = "warn";
const BACKUP_SUBDIR: &str = "backups";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("backup.keep must be at least 1")]
    ZeroRetention,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    database: Option<PathBuf>,
    backup: BackupSection,
    log: LogSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BackupSection {
    enabled: Option<bool>,
    dir: Option<PathBuf>,
    keep: Option<usize>,
    compress: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LogSection {
    filter: Option<String>,
    file: Option<PathBuf>,
}

/// Values that beat the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            database: crate::env::database(),
            backup_dir: crate::env::backup_dir(),
            log_filter: crate::env::log_filter(),
        }
    }

    /// Layer `--db` on top of the environment.
    pub fn with_database(mut self, database: Option<PathBuf>) -> Self {
        if database.is_some() {
            self.database = database;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// File the settings came from, if any.
    pub source: Option<PathBuf>,
    pub database: PathBuf,
    pub backup: BackupConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub keep: usize,
    pub compress: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl Config {
    /// Locate and load the config file, then apply overrides.
    ///
    /// An explicit path must exist; the implicit `./keel.toml` is optional.
    pub fn load(
        explicit: Option<&Path>,
        cwd: &Path,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Some(cwd.join(CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let Some(path) = path else {
            return Self::resolve(ConfigFile::default(), None, overrides);
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        Self::resolve(file, Some(path), overrides)
    }

    /// Parse config text as if it were read from `path`.
    #[cfg(test)]
    pub fn from_toml(text: &str, path: &Path, overrides: &Overrides) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::resolve(file, Some(path.to_path_buf()), overrides)
    }

    fn resolve(
        file: ConfigFile,
        source: Option<PathBuf>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let base = source
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let relative = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };

        let database = match &overrides.database {
            Some(db) => db.clone(),
            None => relative(file.database.unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))),
        };

        let dir = match (&overrides.backup_dir, file.backup.dir) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => relative(dir),
            (None, None) => database
                .parent()
                .map(|p| p.join(BACKUP_SUBDIR))
                .unwrap_or_else(|| PathBuf::from(BACKUP_SUBDIR)),
        };
        let keep = file.backup.keep.unwrap_or(keel_storage::DEFAULT_KEEP);
        if keep == 0 {
            return Err(ConfigError::ZeroRetention);
        }

        let filter = overrides
            .log_filter
            .clone()
            .or(file.log.filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            source,
            database,
            backup: BackupConfig {
                enabled: file.backup.enabled.unwrap_or(true),
                dir,
                keep,
                compress: file.backup.compress.unwrap_or(false),
            },
            log: LogConfig {
                filter,
                file: file.log.file.map(relative),
            },
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
