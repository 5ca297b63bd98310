// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment readiness report.

use serde::Serialize;

/// Read-only view of how far a store is behind the migration registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    /// True iff `pending` is empty.
    pub is_ready: bool,
    /// Number of ledger rows whose last attempt succeeded.
    pub migration_count: usize,
    /// Registry names not yet applied, in registry order.
    pub pending: Vec<String>,
    /// Most recently executed successful migration.
    pub last_migration: Option<String>,
    /// Pending names whose last attempt failed.
    pub failed: Vec<String>,
    /// Succeeded ledger names the registry no longer declares.
    pub unregistered: Vec<String>,
}

impl ReadinessReport {
    /// True when the store holds state worth backing up.
    pub fn has_history(&self) -> bool {
        self.migration_count > 0
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
