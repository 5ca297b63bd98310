// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

// --- Configuration ---

/// Path of the config file (KEEL_CONFIG)
pub fn config_path() -> Option<PathBuf> {
    non_empty("KEEL_CONFIG").map(PathBuf::from)
}

/// Database path override (KEEL_DATABASE)
pub fn database() -> Option<PathBuf> {
    non_empty("KEEL_DATABASE").map(PathBuf::from)
}

/// Backup directory override (KEEL_BACKUP_DIR)
pub fn backup_dir() -> Option<PathBuf> {
    non_empty("KEEL_BACKUP_DIR").map(PathBuf::from)
}

// --- Logging ---

/// Log filter in EnvFilter syntax (KEEL_LOG)
pub fn log_filter() -> Option<String> {
    non_empty("KEEL_LOG")
}

// --- Color ---

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}
