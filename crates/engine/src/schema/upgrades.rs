// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migrations that shipped after the baseline.

use crate::{FnMigration, MigrationError, SqlMigration};
use keel_storage::{Executor, SequenceReconciler, Store};
use tracing::info;

pub const TICKET_NUMBER_INDEX: &str = "002_ticket_number_unique_index";
pub const COMPLIANCE_STATUS: &str = "003_equipment_compliance_status";
pub const STATUS_HISTORY: &str = "004_ticket_status_history";
pub const RECONCILE_SEQUENCES: &str = "005_reconcile_id_sequences";

/// Stores bootstrapped before the baseline carried this index may lack it.
pub fn ticket_number_index() -> SqlMigration {
    SqlMigration::new(
        TICKET_NUMBER_INDEX,
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_tickets_ticket_number ON tickets(ticket_number);",
    )
    .describe("unique ticket numbers")
}

pub fn compliance_status() -> FnMigration {
    FnMigration::new(COMPLIANCE_STATUS, |store: &Store| {
        if !store.column_exists("equipment", "compliance_status")? {
            store.execute(
                "ALTER TABLE equipment ADD COLUMN compliance_status TEXT NOT NULL DEFAULT 'unknown'
                    CHECK (compliance_status IN ('compliant', 'due_soon', 'overdue', 'unknown'));",
            )?;
        }
        store.execute(
            "CREATE INDEX IF NOT EXISTS idx_equipment_compliance_status
                ON equipment(compliance_status);
             UPDATE equipment SET compliance_status = CASE
                 WHEN next_inspection_due IS NULL THEN 'unknown'
                 WHEN next_inspection_due < date('now') THEN 'overdue'
                 WHEN next_inspection_due < date('now', '+30 days') THEN 'due_soon'
                 ELSE 'compliant'
             END
             WHERE compliance_status = 'unknown';",
        )?;
        Ok(())
    })
    .describe("equipment compliance status with backfill")
}

const STATUS_TRIGGER: &str = "trg_tickets_status_history";

pub fn status_history() -> FnMigration {
    FnMigration::new(STATUS_HISTORY, |store: &Store| {
        store.execute(
            "CREATE TABLE IF NOT EXISTS ticket_status_history (
                id INTEGER PRIMARY KEY,
                ticket_id INTEGER NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
                old_status TEXT,
                new_status TEXT NOT NULL,
                changed_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             );
             CREATE INDEX IF NOT EXISTS idx_ticket_status_history_ticket
                ON ticket_status_history(ticket_id, changed_at);",
        )?;
        if !store.trigger_exists(STATUS_TRIGGER)? {
            store.execute(&format!(
                "CREATE TRIGGER {STATUS_TRIGGER}
                 AFTER UPDATE OF status ON tickets
                 FOR EACH ROW WHEN OLD.status IS NOT NEW.status
                 BEGIN
                     INSERT INTO ticket_status_history (ticket_id, old_status, new_status)
                     VALUES (NEW.id, OLD.status, NEW.status);
                 END;"
            ))?;
        }
        Ok(())
    })
    .describe("ticket status change history")
}

pub fn reconcile_sequences() -> FnMigration {
    FnMigration::new(RECONCILE_SEQUENCES, |store: &Store| {
        let states = SequenceReconciler::new(store)
            .reconcile_all(super::BUILTIN_COUNTERS)
            .map_err(MigrationError::from)?;
        let behind = states.iter().filter(|s| s.was_behind()).count();
        info!(
            counters = states.len(),
            behind, "reconciled id counters with existing rows"
        );
        Ok(())
    })
    .describe("realign id counters after explicit-id imports")
}
