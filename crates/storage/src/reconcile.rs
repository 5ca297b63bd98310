// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequence reconciliation.
//!
//! Rows inserted with explicit ids (seed scripts, bulk imports, direct SQL)
//! do not advance their counter, so a later draw can hand out an id that is
//! already taken. Reconciling moves the counter to just past the table's
//! highest id.
//!
//! This is read-then-set with no transactional guard; run it in a
//! maintenance window, not under live write load.

use crate::{quote_ident, Counters, Store, StoreError};
use keel_core::SequenceState;
use tracing::info;

/// Primary-key column assumed by [`SequenceReconciler::reconcile`].
const DEFAULT_KEY_COLUMN: &str = "id";

pub struct SequenceReconciler<'a> {
    store: &'a Store,
}

impl<'a> SequenceReconciler<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Resync `counter` with `MAX(id)` of `table`.
    pub fn reconcile(&self, table: &str, counter: &str) -> Result<SequenceState, StoreError> {
        self.reconcile_column(table, DEFAULT_KEY_COLUMN, counter)
    }

    /// Resync `counter` with the maximum of an explicit key column.
    ///
    /// The counter is set so its next draw returns `max + 1`, even when it
    /// was ahead of the table. An empty table makes the next draw 1.
    pub fn reconcile_column(
        &self,
        table: &str,
        column: &str,
        counter: &str,
    ) -> Result<SequenceState, StoreError> {
        let sql = format!(
            "SELECT COALESCE(MAX({}), 0) FROM {}",
            quote_ident(column)?,
            quote_ident(table)?
        );
        let current_max_id: i64 = self.store.connection().query_row(&sql, [], |row| row.get(0))?;
        let current_max_id = current_max_id.max(0);

        let counters = Counters::new(self.store);
        let previous_next_value = counters
            .peek(counter)?
            .ok_or_else(|| StoreError::UnknownCounter(counter.to_string()))?;
        let next_counter_value = current_max_id.checked_add(1).ok_or_else(|| StoreError::IdOverflow {
            table: table.to_string(),
            column: column.to_string(),
            counter: counter.to_string(),
        })?;
        counters.set_next(counter, next_counter_value)?;

        info!(
            table,
            counter,
            current_max_id,
            previous_next_value,
            next_counter_value,
            "reconciled id sequence",
        );
        Ok(SequenceState {
            table: table.to_string(),
            counter: counter.to_string(),
            current_max_id,
            previous_next_value,
            next_counter_value,
        })
    }

    /// Reconcile each `(table, counter)` pair in order, stopping at the first error.
    pub fn reconcile_all(&self, pairs: &[(&str, &str)]) -> Result<Vec<SequenceState>, StoreError> {
        pairs
            .iter()
            .map(|(table, counter)| self.reconcile(table, counter))
            .collect()
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
