// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration runner.
//!
//! Applies every registered migration whose last attempt did not succeed,
//! in declaration order. The first failure is recorded and returned; nothing
//! after it runs in the same call.

use crate::{MigrationError, MigrationRegistry};
use keel_core::Clock;
use keel_storage::{Ledger, Store, StoreError};
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    PermissionDenied(StoreError),
    #[error("migration ledger error: {0}")]
    Ledger(#[source] StoreError),
    #[error("migration {name} failed after {duration_ms}ms: {source}")]
    Migration {
        name: String,
        duration_ms: u64,
        #[source]
        source: MigrationError,
    },
}

impl RunError {
    /// Name of the migration that failed, if a migration failed.
    pub fn failed_migration(&self) -> Option<&str> {
        match self {
            Self::Migration { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// What one run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Migrations applied by this run, in order.
    pub applied: Vec<String>,
    /// Migrations skipped because they had already succeeded.
    pub skipped: Vec<String>,
}

impl RunSummary {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.applied.is_empty()
    }
}

pub struct MigrationRunner<'a, C: Clock> {
    store: &'a Store,
    registry: &'a MigrationRegistry,
    clock: C,
}

impl<'a, C: Clock> MigrationRunner<'a, C> {
    pub fn new(store: &'a Store, registry: &'a MigrationRegistry, clock: C) -> Self {
        Self {
            store,
            registry,
            clock,
        }
    }

    pub fn run(&self) -> Result<RunSummary, RunError> {
        self.store.probe_write_access().map_err(|e| {
            if e.is_permission_denied() {
                RunError::PermissionDenied(e)
            } else {
                RunError::Ledger(e)
            }
        })?;

        let ledger = Ledger::new(self.store, self.clock.clone());
        ledger.ensure().map_err(RunError::Ledger)?;

        let mut summary = RunSummary::default();
        for migration in self.registry.iter() {
            let name = migration.name();
            if ledger.is_applied(name).map_err(RunError::Ledger)? {
                info!(migration = %name, "already applied, skipping");
                summary.skipped.push(name.to_string());
                continue;
            }

            info!(migration = %name, "applying migration");
            let started = Instant::now();
            let outcome = migration.apply(self.store);
            let duration_ms = elapsed_ms(started);

            match outcome {
                Ok(()) => {
                    ledger
                        .record(name, duration_ms, true)
                        .map_err(RunError::Ledger)?;
                    info!(migration = %name, duration_ms, "applied migration");
                    summary.applied.push(name.to_string());
                }
                Err(source) => {
                    error!(migration = %name, duration_ms, error = %source, "migration failed");
                    if let Err(e) = ledger.record(name, duration_ms, false) {
                        error!(migration = %name, error = %e, "failed to record migration failure");
                    }
                    return Err(RunError::Migration {
                        name: name.to_string(),
                        duration_ms,
                        source,
                    });
                }
            }
        }

        if summary.is_up_to_date() {
            info!(skipped = summary.skipped.len(), "already up to date");
        } else {
            info!(
                applied = summary.applied_count(),
                skipped = summary.skipped.len(),
                "migrations complete",
            );
        }
        Ok(summary)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
