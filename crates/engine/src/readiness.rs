// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment readiness checks.

use crate::MigrationRegistry;
use keel_core::{Clock, ReadinessReport};
use keel_storage::{Ledger, Store, StoreError};
use std::collections::HashSet;

/// Compares the ledger with the registry without touching either.
///
/// Safe on read-only handles and on ledgers still in a legacy structure.
pub struct ReadinessChecker<'a, C: Clock> {
    store: &'a Store,
    registry: &'a MigrationRegistry,
    clock: C,
}

impl<'a, C: Clock> ReadinessChecker<'a, C> {
    pub fn new(store: &'a Store, registry: &'a MigrationRegistry, clock: C) -> Self {
        Self {
            store,
            registry,
            clock,
        }
    }

    pub fn check(&self) -> Result<ReadinessReport, StoreError> {
        let records = Ledger::new(self.store, self.clock.clone()).records()?;

        let succeeded: HashSet<&str> = records
            .iter()
            .filter(|r| r.succeeded)
            .map(|r| r.name.as_str())
            .collect();
        let attempted_and_failed: HashSet<&str> = records
            .iter()
            .filter(|r| !r.succeeded)
            .map(|r| r.name.as_str())
            .collect();

        // Everything from the first unapplied migration onward is pending
        let first_unapplied = self
            .registry
            .iter()
            .position(|m| !succeeded.contains(m.name()))
            .unwrap_or(self.registry.len());
        let pending: Vec<String> = self
            .registry
            .iter()
            .skip(first_unapplied)
            .map(|m| m.name().to_string())
            .collect();
        let failed = pending
            .iter()
            .filter(|name| attempted_and_failed.contains(name.as_str()))
            .cloned()
            .collect();
        let unregistered = records
            .iter()
            .filter(|r| r.succeeded && !self.registry.contains(&r.name))
            .map(|r| r.name.clone())
            .collect();
        // Records are oldest first
        let last_migration = records
            .iter()
            .rev()
            .find(|r| r.succeeded)
            .map(|r| r.name.clone());

        Ok(ReadinessReport {
            is_ready: pending.is_empty(),
            migration_count: succeeded.len(),
            pending,
            last_migration,
            failed,
            unregistered,
        })
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
