// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counter state computed during sequence reconciliation.

use serde::Serialize;

/// Snapshot of one counter against the table it numbers.
///
/// Computed on demand and discarded; after reconciliation
/// `next_counter_value == current_max_id + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceState {
    pub table: String,
    pub counter: String,
    /// Highest primary key in the table, 0 when empty.
    pub current_max_id: i64,
    /// What the next draw would have returned before reconciliation.
    pub previous_next_value: i64,
    /// What the next draw returns now.
    pub next_counter_value: i64,
}

impl SequenceState {
    /// True when the counter was behind the table and could have collided.
    pub fn was_behind(&self) -> bool {
        self.previous_next_value <= self.current_max_id
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
