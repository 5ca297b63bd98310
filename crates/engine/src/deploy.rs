// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deploy workflow: check, back up, migrate, verify.

use crate::{MigrationRegistry, MigrationRunner, ReadinessChecker, RunError, RunSummary};
use keel_core::{Clock, ReadinessReport};
use keel_storage::{BackupCoordinator, BackupOutcome, Store, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that fail a deploy
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("readiness check failed: {0}")]
    Check(#[source] StoreError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("deploy finished but {} migration(s) are still pending: {}", pending.len(), pending.join(", "))]
    NotReady { pending: Vec<String> },
}

/// Everything a deploy observed and did.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub before: ReadinessReport,
    /// `None` when backups are disabled.
    pub backup: Option<BackupOutcome>,
    pub run: RunSummary,
    pub after: ReadinessReport,
}

pub struct Deployment<'a, C: Clock> {
    store: &'a Store,
    registry: &'a MigrationRegistry,
    clock: C,
    backups: Option<&'a BackupCoordinator<C>>,
}

impl<'a, C: Clock> Deployment<'a, C> {
    pub fn new(store: &'a Store, registry: &'a MigrationRegistry, clock: C) -> Self {
        Self {
            store,
            registry,
            clock,
            backups: None,
        }
    }

    /// Take a pre-deploy backup when migrations are pending.
    pub fn with_backups(mut self, coordinator: &'a BackupCoordinator<C>) -> Self {
        self.backups = Some(coordinator);
        self
    }

    pub fn deploy(&self) -> Result<DeployReport, DeployError> {
        let checker = ReadinessChecker::new(self.store, self.registry, self.clock.clone());
        let before = checker.check().map_err(DeployError::Check)?;

        if before.is_ready {
            info!(
                migrations = before.migration_count,
                "store is ready, nothing to deploy"
            );
            return Ok(DeployReport {
                after: before.clone(),
                before,
                backup: self.backups.map(|_| BackupOutcome::Skipped),
                run: RunSummary::default(),
            });
        }

        info!(pending = ?before.pending, "migrations pending");
        let backup = self
            .backups
            .map(|coordinator| coordinator.backup_if_needed(self.store, before.migration_count));
        if backup.is_none() {
            warn!("pre-deploy backups are disabled");
        }

        let run = MigrationRunner::new(self.store, self.registry, self.clock.clone()).run()?;

        let after = checker.check().map_err(DeployError::Check)?;
        if !after.is_ready {
            return Err(DeployError::NotReady {
                pending: after.pending,
            });
        }
        info!(applied = run.applied_count(), "deploy complete");

        Ok(DeployReport {
            before,
            backup,
            run,
            after,
        })
    }
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;
