// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Baseline compliance schema.
//!
//! Every statement is create-if-absent, so the whole baseline can run again
//! over a store that already has it. That matters when a crash lands between
//! the baseline finishing and its ledger row being written.

use crate::SqlMigration;
use keel_storage::COUNTER_TABLE_DDL;

pub const BASELINE: &str = "001_baseline_schema";

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

const TABLES: &str = "
CREATE TABLE IF NOT EXISTS vendors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    contact_email TEXT,
    phone TEXT,
    is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created_at TEXT NOT NULL DEFAULT (@NOW),
    updated_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY,
    vendor_id INTEGER REFERENCES vendors(id) ON DELETE SET NULL,
    name TEXT NOT NULL,
    address TEXT,
    contact_email TEXT,
    created_at TEXT NOT NULL DEFAULT (@NOW),
    updated_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('admin', 'vendor', 'client')),
    vendor_id INTEGER REFERENCES vendors(id) ON DELETE SET NULL,
    client_id INTEGER REFERENCES clients(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (@NOW),
    updated_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS equipment (
    id INTEGER PRIMARY KEY,
    client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    vendor_id INTEGER REFERENCES vendors(id) ON DELETE SET NULL,
    serial_number TEXT NOT NULL,
    equipment_type TEXT NOT NULL,
    location TEXT,
    last_inspection_at TEXT,
    next_inspection_due TEXT,
    created_at TEXT NOT NULL DEFAULT (@NOW),
    updated_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS inspections (
    id INTEGER PRIMARY KEY,
    equipment_id INTEGER NOT NULL REFERENCES equipment(id) ON DELETE CASCADE,
    inspector_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    inspected_at TEXT NOT NULL,
    result TEXT NOT NULL CHECK (result IN ('pass', 'fail', 'conditional')),
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY,
    ticket_number TEXT NOT NULL,
    client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    vendor_id INTEGER REFERENCES vendors(id) ON DELETE SET NULL,
    equipment_id INTEGER REFERENCES equipment(id) ON DELETE SET NULL,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'open'
        CHECK (status IN ('open', 'in_progress', 'resolved', 'closed')),
    priority TEXT NOT NULL DEFAULT 'medium'
        CHECK (priority IN ('low', 'medium', 'high', 'urgent')),
    created_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
    assigned_to INTEGER REFERENCES users(id) ON DELETE SET NULL,
    resolved_at TEXT,
    created_at TEXT NOT NULL DEFAULT (@NOW),
    updated_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS ticket_comments (
    id INTEGER PRIMARY KEY,
    ticket_id INTEGER NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
    author_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY,
    client_id INTEGER REFERENCES clients(id) ON DELETE CASCADE,
    report_type TEXT NOT NULL,
    period_start TEXT NOT NULL,
    period_end TEXT NOT NULL,
    payload TEXT,
    generated_at TEXT NOT NULL DEFAULT (@NOW)
);

CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY,
    actor_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    action TEXT NOT NULL,
    entity_type TEXT NOT NULL,
    entity_id INTEGER,
    details TEXT,
    created_at TEXT NOT NULL DEFAULT (@NOW)
);
";

const INDEXES: &str = "
CREATE INDEX IF NOT EXISTS idx_clients_vendor ON clients(vendor_id);
CREATE INDEX IF NOT EXISTS idx_users_vendor ON users(vendor_id);
CREATE INDEX IF NOT EXISTS idx_users_client ON users(client_id);
CREATE INDEX IF NOT EXISTS idx_equipment_client ON equipment(client_id);
CREATE INDEX IF NOT EXISTS idx_equipment_vendor ON equipment(vendor_id);
CREATE INDEX IF NOT EXISTS idx_equipment_next_due ON equipment(next_inspection_due);
CREATE INDEX IF NOT EXISTS idx_inspections_equipment ON inspections(equipment_id, inspected_at);
CREATE UNIQUE INDEX IF NOT EXISTS ux_tickets_ticket_number ON tickets(ticket_number);
CREATE INDEX IF NOT EXISTS idx_tickets_client_status ON tickets(client_id, status);
CREATE INDEX IF NOT EXISTS idx_ticket_comments_ticket ON ticket_comments(ticket_id);
CREATE INDEX IF NOT EXISTS idx_reports_client ON reports(client_id, period_start);
CREATE INDEX IF NOT EXISTS idx_audit_log_entity ON audit_log(entity_type, entity_id);
";

/// Tables whose `updated_at` is touched on every update.
const TOUCHED: [&str; 5] = ["vendors", "clients", "users", "equipment", "tickets"];

const VIEWS: &str = "
CREATE VIEW IF NOT EXISTS equipment_compliance_overview AS
SELECT
    e.id AS equipment_id,
    e.client_id,
    e.serial_number,
    e.equipment_type,
    e.next_inspection_due,
    (SELECT i.result FROM inspections i
      WHERE i.equipment_id = e.id
      ORDER BY i.inspected_at DESC LIMIT 1) AS last_result,
    CASE
        WHEN e.next_inspection_due IS NULL THEN 0
        WHEN e.next_inspection_due < date('now') THEN 1
        ELSE 0
    END AS is_overdue
FROM equipment e;

CREATE VIEW IF NOT EXISTS open_ticket_counts AS
SELECT client_id, COUNT(*) AS open_tickets
FROM tickets
WHERE status IN ('open', 'in_progress')
GROUP BY client_id;
";

fn touch_trigger(table: &str) -> String {
    format!(
        "CREATE TRIGGER IF NOT EXISTS trg_{table}_touch
AFTER UPDATE ON {table}
FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
BEGIN
    UPDATE {table} SET updated_at = ({NOW}) WHERE id = NEW.id;
END;
"
    )
}

fn seed_counters() -> String {
    let rows: Vec<String> = super::BUILTIN_COUNTERS
        .iter()
        .map(|(_, counter)| format!("('{counter}', 1)"))
        .collect();
    format!(
        "INSERT OR IGNORE INTO id_sequences (name, next_value) VALUES {};",
        rows.join(", ")
    )
}

/// Full baseline script.
pub fn baseline_sql() -> String {
    let mut sql = String::from(COUNTER_TABLE_DDL);
    sql.push_str(&TABLES.replace("@NOW", NOW));
    sql.push_str(INDEXES);
    for table in TOUCHED {
        sql.push_str(&touch_trigger(table));
    }
    sql.push_str(VIEWS);
    sql.push_str(&seed_counters());
    sql
}

pub fn baseline() -> SqlMigration {
    SqlMigration::new(BASELINE, baseline_sql())
        .describe("compliance tables, indexes, touch triggers and reporting views")
}
