// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named id counters.
//!
//! SQLite has no external sequences, so business tables draw primary keys
//! from rows of [`COUNTER_TABLE`]. Each row holds the value its *next* draw
//! returns.

use crate::{quote_ident, Store, StoreError};
use rusqlite::{params, OptionalExtension};

/// Name of the counter table.
pub const COUNTER_TABLE: &str = "id_sequences";

/// DDL for the counter table, shared with the baseline schema.
pub const COUNTER_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS id_sequences (
    name TEXT PRIMARY KEY NOT NULL,
    next_value INTEGER NOT NULL CHECK (next_value > 0)
);";

/// Access to the id counters of one store.
pub struct Counters<'a> {
    store: &'a Store,
}

impl<'a> Counters<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create the counter table if absent.
    pub fn ensure_table(&self) -> Result<(), StoreError> {
        self.store.connection().execute_batch(COUNTER_TABLE_DDL)?;
        Ok(())
    }

    /// Create `name` starting at `start` unless it already exists.
    pub fn ensure_counter(&self, name: &str, start: i64) -> Result<(), StoreError> {
        quote_ident(name)?;
        self.store.connection().execute(
            "INSERT OR IGNORE INTO id_sequences (name, next_value) VALUES (?1, ?2)",
            params![name, start.max(1)],
        )?;
        Ok(())
    }

    /// Return the counter's next value and advance it.
    pub fn draw(&self, name: &str) -> Result<i64, StoreError> {
        self.store
            .connection()
            .query_row(
                "UPDATE id_sequences SET next_value = next_value + 1
                 WHERE name = ?1
                 RETURNING next_value - 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::UnknownCounter(name.to_string()))
    }

    /// The value the next draw would return, without drawing it.
    pub fn peek(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let value = self
            .store
            .connection()
            .query_row(
                "SELECT next_value FROM id_sequences WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Make the next draw of `name` return `next_value`.
    pub fn set_next(&self, name: &str, next_value: i64) -> Result<(), StoreError> {
        let updated = self.store.connection().execute(
            "UPDATE id_sequences SET next_value = ?2 WHERE name = ?1",
            params![name, next_value],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownCounter(name.to_string()));
        }
        Ok(())
    }

    /// All counters and their next values, by name.
    pub fn list(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let mut stmt = self
            .store
            .connection()
            .prepare("SELECT name, next_value FROM id_sequences ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "counter_tests.rs"]
mod tests;
