// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration descriptors.
//!
//! A migration is a name plus a forward action over the store. The runner
//! never looks inside the action; it only learns whether it succeeded.
//! Actions must tolerate objects that already exist, since an earlier
//! migration (usually the baseline) may have created them under another name.

use keel_storage::{Executor, Store, StoreError};
use std::fmt;
use thiserror::Error;

/// Errors raised by a migration's forward action
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Failed(String),
}

/// A forward-only schema change.
pub trait Migration: Send + Sync {
    /// Globally unique name, recorded in the ledger.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Apply the change. Must be safe to run against a store that already
    /// has some or all of its effects.
    fn apply(&self, store: &Store) -> Result<(), MigrationError>;
}

/// Migration whose action is a fixed block of SQL.
#[derive(Debug, Clone)]
pub struct SqlMigration {
    name: String,
    description: String,
    sql: String,
}

impl SqlMigration {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            sql: sql.into(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Migration for SqlMigration {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, store: &Store) -> Result<(), MigrationError> {
        store.execute(&self.sql)?;
        Ok(())
    }
}

type Action = Box<dyn Fn(&Store) -> Result<(), MigrationError> + Send + Sync>;

/// Migration whose action is arbitrary code, for changes that need to
/// inspect the schema before acting.
pub struct FnMigration {
    name: String,
    description: String,
    action: Action,
}

impl FnMigration {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Store) -> Result<(), MigrationError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            action: Box::new(action),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for FnMigration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMigration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Migration for FnMigration {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, store: &Store) -> Result<(), MigrationError> {
        (self.action)(store)
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
