// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered, append-only migration registry.
//!
//! Building a registry does no I/O. Declaration order is execution order;
//! names carrying a numeric `NNN_` prefix must keep increasing so a
//! migration appended out of place is caught at startup.

use crate::Migration;
use keel_core::migration::sequence_prefix;
use thiserror::Error;

/// Errors raised while assembling a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("migration name must not be empty")]
    EmptyName,
    #[error("migration {0} is registered twice")]
    DuplicateName(String),
    #[error("migration {name} is declared after {previous}, which has a higher number")]
    OutOfOrder { name: String, previous: String },
}

/// Migrations in the order they must run.
#[derive(Default)]
pub struct MigrationRegistry {
    migrations: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a migration to the end of the registry.
    pub fn register(&mut self, migration: impl Migration + 'static) -> Result<(), RegistryError> {
        self.register_boxed(Box::new(migration))
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, migration: impl Migration + 'static) -> Result<Self, RegistryError> {
        self.register(migration)?;
        Ok(self)
    }

    pub fn register_boxed(&mut self, migration: Box<dyn Migration>) -> Result<(), RegistryError> {
        let name = migration.name();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.contains(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        if let Some(previous) = self.highest_numbered() {
            if let (Some(prev), Some(next)) = (sequence_prefix(previous), sequence_prefix(name)) {
                if next <= prev {
                    return Err(RegistryError::OutOfOrder {
                        name: name.to_string(),
                        previous: previous.to_string(),
                    });
                }
            }
        }
        self.migrations.push(migration);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Migration> {
        self.iter().find(|m| m.name() == name)
    }

    /// Names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|m| m.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.iter().map(|m| m.as_ref())
    }

    fn highest_numbered(&self) -> Option<&str> {
        self.iter()
            .map(|m| m.name())
            .filter(|n| sequence_prefix(n).is_some())
            .last()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
