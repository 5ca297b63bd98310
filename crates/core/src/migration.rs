// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger row describing the last execution attempt of one migration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a migration's last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    Succeeded,
    Failed,
}

impl MigrationStatus {
    pub fn from_succeeded(succeeded: bool) -> Self {
        if succeeded {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One row per migration name, ever.
///
/// A retried migration overwrites its row, so only the latest attempt is
/// visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub name: String,
    pub executed_at: DateTime<Utc>,
    /// `None` for rows carried over from ledgers that never tracked timing.
    pub duration_ms: Option<u64>,
    pub succeeded: bool,
}

impl MigrationRecord {
    pub fn status(&self) -> MigrationStatus {
        MigrationStatus::from_succeeded(self.succeeded)
    }
}

/// Numeric ordering prefix of a `NNN_description` name, if it has one.
pub fn sequence_prefix(name: &str) -> Option<u32> {
    let digits: &str = name.split('_').next()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
