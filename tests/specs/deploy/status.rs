// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Readiness status specs

use crate::prelude::*;

#[test]
fn status_on_missing_database_lists_everything_pending() {
    let project = Project::empty();

    project
        .keel()
        .args(&["status"])
        .passes()
        .stdout_has("Status:   pending\n")
        .stdout_has("Applied:  0\n")
        .stdout_has("Pending (5):\n  001_baseline_schema\n");

    assert!(!project.db_path().exists());
}

#[test]
fn status_check_exits_3_until_deployed() {
    let project = Project::empty();
    project.keel().args(&["status", "--check"]).exits(3);

    project.keel().args(&["deploy"]).passes();

    project
        .keel()
        .args(&["status", "--check"])
        .passes()
        .stdout_has("Status:   ready\n")
        .stdout_has("Latest:   005_reconcile_id_sequences\n");
}

#[test]
fn status_check_prints_no_error_line() {
    let project = Project::empty();
    let run = project.keel().args(&["status", "--check"]).exits(3);
    assert!(!run.stderr().contains("Error:"));
}

#[test]
fn status_json_report() {
    let project = Project::deployed();
    let report = project.keel().args(&["status", "-o", "json"]).passes().json();

    assert_eq!(report["is_ready"], true);
    assert_eq!(report["migration_count"], 5);
    assert_eq!(report["last_migration"], "005_reconcile_id_sequences");
    assert_eq!(report["pending"].as_array().unwrap().len(), 0);
}

#[test]
fn lost_ledger_row_shows_as_pending() {
    let project = Project::deployed();
    project.sql("DELETE FROM schema_migrations WHERE name = '003_equipment_compliance_status';");

    project
        .keel()
        .args(&["status", "--check"])
        .exits(3)
        .stdout_has(
            "Pending (3):\n  003_equipment_compliance_status\n  004_ticket_status_history\n  005_reconcile_id_sequences\n",
        );
}

#[test]
fn failed_attempt_is_flagged() {
    let project = Project::deployed();
    project.sql(
        "UPDATE schema_migrations SET succeeded = 0 WHERE name = '004_ticket_status_history';",
    );

    project
        .keel()
        .args(&["status"])
        .passes()
        .stdout_has("  004_ticket_status_history  failed\n");
}

#[test]
fn retired_migration_is_listed_as_unregistered() {
    let project = Project::deployed();
    project.sql(
        "INSERT INTO schema_migrations (name, executed_at, duration_ms, succeeded) \
         VALUES ('000_legacy_import', '2025-06-01T00:00:00Z', 10, 1);",
    );

    project
        .keel()
        .args(&["status", "--check"])
        .passes()
        .stdout_has("Unregistered (1):\n  000_legacy_import\n");
}
